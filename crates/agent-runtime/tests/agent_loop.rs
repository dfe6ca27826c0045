//! Agentic loop tests against a scripted backend

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use agent_llm::{Message, MessageRole, ModelResponse, ScriptedProvider};
use agent_runtime::{
    Agent, AgentRuntimeError, AgentStatus, HookError, Inbox, LoopState, NoHooks, RunHooks,
    ToolInvocation,
};
use agent_tools::{builtin::EchoTool, ToolRegistry};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

fn agent_with(provider: &ScriptedProvider) -> Agent {
    let tools = ToolRegistry::new();
    tools.register(EchoTool).unwrap();

    Agent::builder()
        .name("Alice")
        .description("Test agent")
        .model("test-model")
        .provider(provider.clone())
        .tools(tools)
        .build()
        .unwrap()
}

fn echo(text: &str) -> ModelResponse {
    ModelResponse::tool_calls(vec![ScriptedProvider::call("echo", json!({ "text": text }))])
}

#[tokio::test]
async fn test_tool_call_round_trip() {
    let provider = ScriptedProvider::new(vec![echo("hi"), ModelResponse::text("done")]);
    let mut agent = agent_with(&provider);
    agent.push_message(Message::user("hello"));

    let response = agent.run(&NoHooks).await.unwrap();
    assert_eq!(response, "done");

    let history = agent.history().messages();
    let roles: Vec<MessageRole> = history.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::ToolResult,
            MessageRole::Assistant,
        ]
    );
    assert_eq!(history[2].content, "hi");
    assert_eq!(
        history[2].tool_call_id.as_deref(),
        Some(history[1].tool_calls[0].id.as_str())
    );
    assert_eq!(history[3].content, "done");
    assert_eq!(agent.state(), LoopState::Done);
    assert_eq!(agent.status(), AgentStatus::Idle);

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].history.len(), 3);
    assert_eq!(requests[0].tool_names, vec!["echo".to_string()]);
    assert!(requests[0].system_prompt.as_deref().unwrap().contains("Alice"));
}

struct MockedToolHooks;

#[async_trait]
impl RunHooks for MockedToolHooks {
    async fn on_tool_call(&self, _call: ToolInvocation) -> Result<String, HookError> {
        Ok("MOCKED".to_string())
    }
}

#[tokio::test]
async fn test_tool_call_hook_substitutes_result() {
    let provider = ScriptedProvider::new(vec![echo("real output"), ModelResponse::text("ok")]);
    let mut agent = agent_with(&provider);
    agent.push_message(Message::user("go"));

    agent.run(&MockedToolHooks).await.unwrap();

    let results: Vec<&Message> = agent
        .history()
        .messages()
        .iter()
        .filter(|m| m.role == MessageRole::ToolResult)
        .collect();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content, "MOCKED");
}

#[tokio::test]
async fn test_resolution_errors_are_reported_to_model() {
    let provider = ScriptedProvider::new(vec![
        ModelResponse::tool_calls(vec![
            ScriptedProvider::call("nope", json!({})),
            ScriptedProvider::call("echo", json!({})),
            ScriptedProvider::call("echo", json!({"text": 5})),
        ]),
        ModelResponse::text("recovered"),
    ]);
    let mut agent = agent_with(&provider);
    agent.push_message(Message::user("go"));

    assert_eq!(agent.run(&NoHooks).await.unwrap(), "recovered");

    let results: Vec<String> = agent
        .history()
        .messages()
        .iter()
        .filter(|m| m.role == MessageRole::ToolResult)
        .map(|m| m.content.clone())
        .collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0], "Unknown tool: nope");
    assert!(results[1].starts_with("Invalid arguments for echo: missing required argument 'text'"));
    assert!(results[2].starts_with("Invalid arguments for echo: argument 'text' must be of type string"));
}

#[tokio::test]
async fn test_backend_error_is_fatal() {
    let provider = ScriptedProvider::new(vec![echo("hi")]);
    provider.fail_next("backend down");
    let mut agent = agent_with(&provider);
    agent.push_message(Message::user("go"));

    let result = agent.run(&NoHooks).await;
    assert!(matches!(result, Err(AgentRuntimeError::LLM(_))));
    assert_eq!(agent.status(), AgentStatus::Idle);
    assert_eq!(provider.call_count(), 2);
    // the tool round before the failure is kept
    assert_eq!(agent.history().len(), 3);
}

struct FailingHooks;

#[async_trait]
impl RunHooks for FailingHooks {
    async fn on_before_iteration(&self) -> Result<(), HookError> {
        Err(HookError::new("not allowed"))
    }
}

#[tokio::test]
async fn test_callback_error_is_fatal() {
    let provider = ScriptedProvider::repeating("never seen");
    let mut agent = agent_with(&provider);

    let result = agent.run(&FailingHooks).await;
    assert!(matches!(result, Err(AgentRuntimeError::Callback(_))));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_history_is_append_only() {
    let provider = ScriptedProvider::new(vec![echo("a"), echo("b"), ModelResponse::text("end")]);
    let mut agent = agent_with(&provider);
    agent.push_message(Message::user("start"));

    agent.run(&NoHooks).await.unwrap();

    let final_history = agent.history().snapshot();
    let requests = provider.requests();
    let mut previous_len = 0;
    for request in &requests {
        assert!(request.history.len() > previous_len);
        assert_eq!(&final_history[..request.history.len()], request.history.as_slice());
        previous_len = request.history.len();
    }
    assert_eq!(final_history.len(), 6);
}

#[derive(Default)]
struct CountingHooks {
    before: AtomicUsize,
    after: AtomicUsize,
    tool_calls: AtomicUsize,
    messages: AtomicUsize,
}

#[async_trait]
impl RunHooks for CountingHooks {
    async fn on_before_iteration(&self) -> Result<(), HookError> {
        self.before.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn on_after_iteration(&self) -> Result<(), HookError> {
        self.after.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn on_tool_call(&self, call: ToolInvocation) -> Result<String, HookError> {
        self.tool_calls.fetch_add(1, Ordering::SeqCst);
        Ok(call.invoke().await)
    }

    async fn on_message(&self, message: &Message) -> Result<(), HookError> {
        assert_eq!(message.content, "finished");
        self.messages.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_hook_call_counts() {
    let provider = ScriptedProvider::new(vec![
        ModelResponse::tool_calls(vec![
            ScriptedProvider::call("echo", json!({"text": "1"})),
            ScriptedProvider::call("echo", json!({"text": "2"})),
        ]),
        echo("3"),
        ModelResponse::text("finished"),
    ]);
    let mut agent = agent_with(&provider);
    let hooks = CountingHooks::default();

    agent.run(&hooks).await.unwrap();

    assert_eq!(hooks.before.load(Ordering::SeqCst), 3);
    assert_eq!(hooks.after.load(Ordering::SeqCst), 3);
    assert_eq!(hooks.tool_calls.load(Ordering::SeqCst), 3);
    assert_eq!(hooks.messages.load(Ordering::SeqCst), 1);
}

#[derive(Default)]
struct QueueInbox {
    queue: Mutex<VecDeque<Message>>,
}

impl Inbox for QueueInbox {
    fn drain(&self) -> Vec<Message> {
        self.queue.lock().drain(..).collect()
    }
}

struct LateMailHooks {
    inbox: Arc<QueueInbox>,
}

#[async_trait]
impl RunHooks for LateMailHooks {
    async fn on_tool_call(&self, call: ToolInvocation) -> Result<String, HookError> {
        self.inbox.queue.lock().push_back(Message::user("m3"));
        Ok(call.invoke().await)
    }
}

#[tokio::test]
async fn test_inbox_is_merged_before_each_model_call() {
    let provider = ScriptedProvider::new(vec![echo("x"), ModelResponse::text("done")]);
    let mut agent = agent_with(&provider);

    let inbox = Arc::new(QueueInbox::default());
    inbox.queue.lock().extend([Message::user("m1"), Message::user("m2")]);
    let hooks = LateMailHooks {
        inbox: Arc::clone(&inbox),
    };

    agent.run_with_inbox(&hooks, inbox.as_ref()).await.unwrap();

    let requests = provider.requests();
    let first: Vec<&str> = requests[0].history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(first, vec!["m1", "m2"]);

    // m3 arrived mid-round and lands after that round's tool result
    let second = &requests[1].history;
    assert_eq!(second.len(), 5);
    assert_eq!(second[3].role, MessageRole::ToolResult);
    assert_eq!(second[4].content, "m3");
    assert!(inbox.queue.lock().is_empty());
}

#[tokio::test]
async fn test_max_iterations_exceeded() {
    let provider = ScriptedProvider::new(vec![echo("1"), echo("2"), echo("3")]);
    let tools = ToolRegistry::new();
    tools.register(EchoTool).unwrap();
    let mut agent = Agent::builder()
        .name("Looper")
        .provider(provider.clone())
        .tools(tools)
        .max_iterations(2)
        .build()
        .unwrap();

    let result = agent.run(&NoHooks).await;
    assert!(matches!(result, Err(AgentRuntimeError::MaxIterationsExceeded(2))));
    assert_eq!(provider.call_count(), 2);
}
