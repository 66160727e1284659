use std::sync::Arc;
use tracing::info;

use crate::agent::error::AgentError;
use crate::agent::stateless_llm::{OpenAICompatibleLLM, StatelessLLMInterface};
use crate::agent::tools::{TavilySearch, Tool};
use crate::config::Settings;

/// Builds the pieces an agent run needs.
/// The backend holds one of these; tests swap in fakes.
pub trait AgentComponents: Send + Sync {
    /// Chat model bound to `llm_id`
    fn chat_model(&self, llm_id: &str) -> Result<Arc<dyn StatelessLLMInterface>, AgentError>;

    /// Web search tool returning at most `max_results` hits per call
    fn web_search(&self, max_results: usize) -> Result<Arc<dyn Tool>, AgentError>;

    /// Model turns allowed before a run is abandoned
    fn step_limit(&self) -> usize;
}

/// Factory backed by Groq for the model and Tavily for search
pub struct AgentFactory {
    client: reqwest::Client,
    settings: Arc<Settings>,
}

impl AgentFactory {
    pub fn new(settings: Arc<Settings>) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(AgentError::from_network_error)?;
        Ok(Self { client, settings })
    }
}

impl AgentComponents for AgentFactory {
    fn chat_model(&self, llm_id: &str) -> Result<Arc<dyn StatelessLLMInterface>, AgentError> {
        info!("Initializing LLM: {}", llm_id);
        let api_key = self
            .settings
            .groq_api_key
            .clone()
            .ok_or(AgentError::MissingCredential("GROQ_API_KEY"))?;

        Ok(Arc::new(OpenAICompatibleLLM::new(
            self.client.clone(),
            llm_id.to_string(),
            self.settings.groq_base_url.clone(),
            api_key,
            self.settings.groq_temperature,
        )))
    }

    fn web_search(&self, max_results: usize) -> Result<Arc<dyn Tool>, AgentError> {
        let api_key = self
            .settings
            .tavily_api_key
            .clone()
            .ok_or(AgentError::MissingCredential("TAVILY_API_KEY"))?;

        Ok(Arc::new(TavilySearch::new(
            self.client.clone(),
            self.settings.tavily_base_url.clone(),
            api_key,
            max_results,
        )))
    }

    fn step_limit(&self) -> usize {
        self.settings.agent_step_limit
    }
}
