use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::agent::AgentError;

/// Body of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model_name: String,
    #[serde(default)]
    pub system_prompt: String,
    pub messages: Vec<String>,
    #[serde(default)]
    pub allow_search: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Error body returned by the backend for 4xx/5xx answers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Outcome of a chat call as the UI sees it
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Answer(String),
    Rejected { status: StatusCode, detail: String },
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatOutcome, AgentError> {
        let url = format!("{}/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(AgentError::from_network_error)?;

        let status = response.status();
        if status.is_success() {
            let body: ChatResponse = response
                .json()
                .await
                .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;
            return Ok(ChatOutcome::Answer(body.response));
        }

        let text = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.detail)
            .unwrap_or(text);
        Ok(ChatOutcome::Rejected { status, detail })
    }

    pub async fn health_check(&self) -> Result<bool, AgentError> {
        let url = format!("{}/api/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(AgentError::from_network_error)?;
        Ok(response.status().is_success())
    }
}
