use async_trait::async_trait;

use crate::agent::error::AgentError;
use crate::agent::message::{AssistantTurn, Message};
use crate::agent::tools::ToolSpec;

/// Interface for a stateless language model
/// Stateless means the LLM doesn't store memory or system prompts; every call
/// carries the full transcript.
#[async_trait]
pub trait StatelessLLMInterface: Send + Sync {
    /// Model identifier this client is bound to
    fn model_id(&self) -> &str;

    /// Generate one assistant turn for the transcript.
    /// `tools` may be empty, in which case no function calling is offered.
    async fn chat_completion(
        &self,
        messages: &[Message],
        system: Option<&str>,
        tools: &[ToolSpec],
    ) -> Result<AssistantTurn, AgentError>;
}
