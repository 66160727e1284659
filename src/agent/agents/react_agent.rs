use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::agent::error::AgentError;
use crate::agent::message::{Message, ToolCall};
use crate::agent::stateless_llm::StatelessLLMInterface;
use crate::agent::tools::{Tool, ToolSpec};

pub const DEFAULT_STEP_LIMIT: usize = 25;

/// Agent that alternates model turns and tool execution until the model
/// answers without requesting any tool.
pub struct ReactAgent {
    llm: Arc<dyn StatelessLLMInterface>,
    tools: HashMap<String, Arc<dyn Tool>>,
    specs: Vec<ToolSpec>,
    system: String,
    step_limit: usize,
}

impl ReactAgent {
    /// Initialize the agent with an LLM, its tools and a system prompt
    ///
    /// # Arguments
    /// * `llm` - The LLM to reason with
    /// * `tools` - Tools offered to the model, possibly none
    /// * `system` - Instruction sent ahead of the transcript on every turn
    pub fn new(llm: Arc<dyn StatelessLLMInterface>, tools: Vec<Arc<dyn Tool>>, system: String) -> Self {
        let specs: Vec<ToolSpec> = tools.iter().map(|t| t.spec()).collect();
        let tools = specs
            .iter()
            .map(|spec| spec.name.clone())
            .zip(tools)
            .collect();

        info!(
            "ReactAgent initialized: model={}, tools={:?}",
            llm.model_id(),
            specs.iter().map(|s| s.name.as_str()).collect::<Vec<_>>()
        );

        Self {
            llm,
            tools,
            specs,
            system,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit.max(1);
        self
    }

    pub fn tool_specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    /// Run the loop on an initial conversation and return the full transcript
    pub async fn invoke(&self, mut messages: Vec<Message>) -> Result<Vec<Message>, AgentError> {
        let system = Some(self.system.as_str()).filter(|s| !s.is_empty());

        for step in 1..=self.step_limit {
            let turn = self
                .llm
                .chat_completion(&messages, system, &self.specs)
                .await?;
            debug!(step, tool_calls = turn.tool_calls.len(), "Model turn");

            let calls = turn.tool_calls.clone();
            messages.push(turn.into());

            if calls.is_empty() {
                return Ok(messages);
            }

            for call in &calls {
                let output = self.run_tool(call).await;
                messages.push(Message::tool_result(call, output));
            }
        }

        warn!("Agent hit step limit of {}", self.step_limit);
        Err(AgentError::StepLimitExceeded(self.step_limit))
    }

    /// Execute one call; failures become text for the model to react to
    async fn run_tool(&self, call: &ToolCall) -> String {
        let Some(tool) = self.tools.get(&call.name) else {
            warn!("Model requested unknown tool: {}", call.name);
            let valid: Vec<&str> = self.specs.iter().map(|s| s.name.as_str()).collect();
            return format!(
                "Error: {} is not a valid tool, try one of [{}].",
                call.name,
                valid.join(", ")
            );
        };

        let arguments = if call.arguments.trim().is_empty() {
            serde_json::Value::Object(Default::default())
        } else {
            match serde_json::from_str(&call.arguments) {
                Ok(args) => args,
                Err(e) => {
                    warn!("Invalid arguments for {}: {}", call.name, e);
                    return format!("Error: invalid JSON arguments for {}: {}", call.name, e);
                }
            }
        };

        debug!(tool = %call.name, "Calling tool");
        match tool.call(arguments).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Tool {} failed: {}", call.name, e);
                format!("Error: {}\n Please fix your mistakes.", e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::agent::message::{last_assistant_text, AssistantTurn, Role};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Model that replays canned turns and records what it was shown
    pub(crate) struct ScriptedLLM {
        turns: Mutex<VecDeque<AssistantTurn>>,
        pub(crate) seen_tools: Mutex<Vec<Vec<String>>>,
        pub(crate) seen_system: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedLLM {
        pub(crate) fn new(turns: Vec<AssistantTurn>) -> Self {
            Self {
                turns: Mutex::new(turns.into()),
                seen_tools: Mutex::new(Vec::new()),
                seen_system: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StatelessLLMInterface for ScriptedLLM {
        fn model_id(&self) -> &str {
            "scripted"
        }

        async fn chat_completion(
            &self,
            _messages: &[Message],
            system: Option<&str>,
            tools: &[ToolSpec],
        ) -> Result<AssistantTurn, AgentError> {
            self.seen_tools
                .lock()
                .unwrap()
                .push(tools.iter().map(|t| t.name.clone()).collect());
            self.seen_system
                .lock()
                .unwrap()
                .push(system.map(str::to_string));
            Ok(self
                .turns
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| AssistantTurn::text("out of script")))
        }
    }

    /// Tool that echoes its query and counts invocations
    pub(crate) struct EchoTool {
        pub(crate) calls: Mutex<Vec<serde_json::Value>>,
        fail: bool,
    }

    impl EchoTool {
        pub(crate) fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn spec(&self) -> ToolSpec {
            ToolSpec {
                name: "echo".to_string(),
                description: "echoes the query".to_string(),
                parameters: serde_json::json!({"type": "object"}),
            }
        }

        async fn call(&self, arguments: serde_json::Value) -> Result<String, AgentError> {
            self.calls.lock().unwrap().push(arguments.clone());
            if self.fail {
                return Err(AgentError::tool("echo", "boom"));
            }
            Ok(format!("echo: {}", arguments["query"].as_str().unwrap_or("")))
        }
    }

    pub(crate) fn tool_turn(id: &str, name: &str, arguments: &str) -> AssistantTurn {
        AssistantTurn {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: arguments.to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_final_answer_without_tools() {
        let llm = Arc::new(ScriptedLLM::new(vec![AssistantTurn::text("4")]));
        let agent = ReactAgent::new(llm.clone(), vec![], "You are a calculator".to_string());

        let transcript = agent.invoke(vec![Message::user("What is 2+2?")]).await.unwrap();

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1], Message::assistant("4"));
        assert_eq!(last_assistant_text(&transcript).unwrap(), "4");
        assert_eq!(
            llm.seen_system.lock().unwrap()[0].as_deref(),
            Some("You are a calculator")
        );
    }

    #[tokio::test]
    async fn test_tool_result_is_fed_back_before_final_answer() {
        let llm = Arc::new(ScriptedLLM::new(vec![
            tool_turn("call_1", "echo", r#"{"query":"weather"}"#),
            AssistantTurn::text("It is sunny"),
        ]));
        let tool = Arc::new(EchoTool::new());
        let tools: Vec<Arc<dyn Tool>> = vec![tool.clone()];
        let agent = ReactAgent::new(llm.clone(), tools, String::new());

        let transcript = agent.invoke(vec![Message::user("weather?")]).await.unwrap();

        let roles: Vec<Role> = transcript.iter().map(Message::role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]
        );
        assert_eq!(transcript[2].content(), "echo: weather");
        assert_eq!(tool.calls.lock().unwrap().len(), 1);
        assert_eq!(last_assistant_text(&transcript).unwrap(), "It is sunny");
        // empty system prompt is not sent at all
        assert_eq!(llm.seen_system.lock().unwrap()[0], None);
        assert_eq!(llm.seen_tools.lock().unwrap()[0], vec!["echo".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_to_model() {
        let llm = Arc::new(ScriptedLLM::new(vec![
            tool_turn("call_1", "calculator", "{}"),
            AssistantTurn::text("sorry"),
        ]));
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(EchoTool::new())];
        let agent = ReactAgent::new(llm, tools, String::new());

        let transcript = agent.invoke(vec![Message::user("2+2")]).await.unwrap();

        assert!(transcript[2]
            .content()
            .starts_with("Error: calculator is not a valid tool"));
        assert_eq!(last_assistant_text(&transcript).unwrap(), "sorry");
    }

    #[tokio::test]
    async fn test_tool_failure_and_bad_arguments_do_not_abort() {
        let llm = Arc::new(ScriptedLLM::new(vec![
            tool_turn("call_1", "echo", "{not json"),
            tool_turn("call_2", "echo", r#"{"query":"x"}"#),
            AssistantTurn::text("done"),
        ]));
        let tool = Arc::new(EchoTool::failing());
        let tools: Vec<Arc<dyn Tool>> = vec![tool.clone()];
        let agent = ReactAgent::new(llm, tools, String::new());

        let transcript = agent.invoke(vec![Message::user("go")]).await.unwrap();

        assert!(transcript[2].content().starts_with("Error: invalid JSON arguments"));
        assert!(transcript[4].content().contains("boom"));
        // the malformed call never reached the tool
        assert_eq!(tool.calls.lock().unwrap().len(), 1);
        assert_eq!(last_assistant_text(&transcript).unwrap(), "done");
    }

    #[tokio::test]
    async fn test_step_limit() {
        let turns = (0..5)
            .map(|i| tool_turn(&format!("call_{}", i), "echo", r#"{"query":"again"}"#))
            .collect();
        let llm = Arc::new(ScriptedLLM::new(turns));
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(EchoTool::new())];
        let agent = ReactAgent::new(llm, tools, String::new()).with_step_limit(3);

        let err = agent.invoke(vec![Message::user("loop")]).await.unwrap_err();
        assert!(matches!(err, AgentError::StepLimitExceeded(3)));
    }
}
