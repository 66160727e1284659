use std::sync::Arc;
use tracing::{debug, info};

use crate::agent::agent_factory::AgentComponents;
use crate::agent::agents::ReactAgent;
use crate::agent::error::AgentError;
use crate::agent::message::{last_assistant_text, Message};
use crate::agent::tools::{Tool, SEARCH_MAX_RESULTS};

/// Build a tool-using agent for one request, run it and return its answer.
///
/// # Arguments
/// * `components` - Source of the chat model and search tool
/// * `llm_id` - Model identifier, e.g. `llama-3.3-70b-versatile`
/// * `queries` - User messages that open the conversation, in order
/// * `allow_search` - Whether the agent gets a web search tool
/// * `system_prompt` - Instruction for the agent
///
/// # Returns
/// Text of the last assistant message in the transcript
pub async fn ask_agent(
    components: &dyn AgentComponents,
    llm_id: &str,
    queries: &[String],
    allow_search: bool,
    system_prompt: &str,
) -> Result<String, AgentError> {
    let llm = components.chat_model(llm_id)?;

    let tools: Vec<Arc<dyn Tool>> = if allow_search {
        vec![components.web_search(SEARCH_MAX_RESULTS)?]
    } else {
        Vec::new()
    };

    let agent = ReactAgent::new(llm, tools, system_prompt.to_string())
        .with_step_limit(components.step_limit());

    let state: Vec<Message> = queries.iter().map(|q| Message::user(q.as_str())).collect();
    info!(model = llm_id, allow_search, queries = state.len(), "Invoking agent");

    let transcript = agent.invoke(state).await?;
    debug!(messages = transcript.len(), "Agent finished");

    last_assistant_text(&transcript).map(str::to_string)
}
