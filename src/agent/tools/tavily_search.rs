use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::tool_interface::{Tool, ToolSpec};
use crate::agent::error::AgentError;

/// Upper bound on results returned per search call
pub const SEARCH_MAX_RESULTS: usize = 2;

pub const TAVILY_TOOL_NAME: &str = "tavily_search";

/// Web search backed by the Tavily search API
pub struct TavilySearch {
    client: Client,
    base_url: String,
    api_key: String,
    max_results: usize,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    search_depth: &'static str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// One hit as handed back to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

impl TavilySearch {
    /// `max_results` is clamped to `1..=SEARCH_MAX_RESULTS`
    pub fn new(client: Client, base_url: String, api_key: String, max_results: usize) -> Self {
        let max_results = max_results.clamp(1, SEARCH_MAX_RESULTS);
        info!("Initialized TavilySearch: max_results={}", max_results);
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            max_results,
        }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, AgentError> {
        let request = SearchRequest {
            query,
            max_results: self.max_results,
            search_depth: "basic",
        };
        debug!(query, max_results = self.max_results, "Tavily search");

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(AgentError::from_network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::from_http_status(status, body));
        }

        let mut parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(e.to_string()))?;
        parsed.results.truncate(self.max_results);
        Ok(parsed.results)
    }
}

#[async_trait]
impl Tool for TavilySearch {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TAVILY_TOOL_NAME.to_string(),
            description: "A search engine optimized for comprehensive, accurate, and trusted \
                results. Useful for answering questions about current events. Input should \
                be a search query."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query to look up"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, arguments: serde_json::Value) -> Result<String, AgentError> {
        let query = arguments
            .get("query")
            .and_then(|v| v.as_str())
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AgentError::tool(TAVILY_TOOL_NAME, "missing required argument 'query'"))?;

        let results = self.search(query).await?;
        serde_json::to_string(&results).map_err(|e| AgentError::tool(TAVILY_TOOL_NAME, e.to_string()))
    }
}
