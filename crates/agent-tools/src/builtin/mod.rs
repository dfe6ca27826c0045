//! Built-in tools

pub mod bash;
pub mod echo;

pub use bash::BashTool;
pub use echo::EchoTool;
