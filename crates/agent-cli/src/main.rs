//! Agency shell
//!
//! Runs Alice, Bob and Hannah as one agency and feeds every line typed at
//! the prompt to Alice. Bob has shell access; the others only talk.
//!
//! Usage: `agency [CONFIG]` (defaults to `agency.toml`)

use std::io::{BufRead, Write};
use std::sync::Arc;

use agent_comms::Agency;
use agent_core::{
    config::{load_config_or_default, AgencyConfig},
    logging::{init_logging, LogConfig},
};
use agent_llm::{LLMProvider, OpenAIProvider};
use agent_runtime::Agent;
use agent_tools::{builtin::BashTool, ToolRegistry};
use anyhow::Context;

mod printer;

use printer::ConsolePrinter;

const ENTRY_AGENT: &str = "Alice";

fn build_agents(config: &AgencyConfig, provider: Arc<dyn LLMProvider>) -> anyhow::Result<Vec<Agent>> {
    let base = || {
        Agent::builder()
            .shared_provider(Arc::clone(&provider))
            .model(config.model.model.clone())
            .max_iterations(config.agency.max_iterations)
    };

    let bob_tools = ToolRegistry::new();
    bob_tools.register(BashTool)?;

    Ok(vec![
        base().name("Alice").build()?,
        base()
            .name("Bob")
            .description("Has access to the computer.")
            .tools(bob_tools)
            .build()?,
        base().name("Hannah").build()?,
    ])
}

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "agency.toml".to_string());
    let config = load_config_or_default(&config_path);
    init_logging(LogConfig::from(&config.logging));

    let api_key = config.model.api_key().with_context(|| {
        format!(
            "no API key found; set {} in the environment",
            config.model.api_key_env
        )
    })?;

    let provider: Arc<dyn LLMProvider> = Arc::new(
        OpenAIProvider::new(api_key)?
            .with_base_url(config.model.base_url.clone())
            .with_timeout(config.model.timeout()),
    );

    let agents = build_agents(&config, provider)?;
    let roster = agents.iter().map(|agent| agent.info().clone()).collect();

    let agency = Agency::builder()
        .agents(agents)
        .hooks(ConsolePrinter::new(roster))
        .config(&config)
        .build()?;

    tracing::info!(model = %config.model.model, "Agency ready");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        agency.run(ENTRY_AGENT, Some(line))?;
        if !agency.wait_for_idle(config.agency.shutdown_timeout()) {
            tracing::warn!("Agents still busy after {:?}", config.agency.shutdown_timeout());
        }
    }

    agency.shutdown(config.agency.shutdown_timeout())?;
    Ok(())
}
