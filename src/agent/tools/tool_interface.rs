use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agent::error::AgentError;

/// Function-calling description advertised to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: serde_json::Value,
}

/// A tool the agent may call between model turns
#[async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> ToolSpec;

    /// Run the tool with the model-supplied arguments.
    /// The returned text is fed back to the model verbatim.
    async fn call(&self, arguments: serde_json::Value) -> Result<String, AgentError>;
}
