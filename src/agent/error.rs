//! Typed errors for agent runs
//!
//! Covers the hosted chat model, the tools it calls and the reason/act loop
//! itself, so callers can tell a rate limit apart from a broken transcript.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// API key rejected (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Quota exceeded (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Malformed request (HTTP 400), e.g. an unknown model id
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Server-side failure (HTTP 5xx)
    #[error("Service error: {0}")]
    ServiceError(String),

    /// Connection refused, timeout and friends
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered, but not with something we can use
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("Tool '{name}' failed: {message}")]
    Tool { name: String, message: String },

    #[error("Agent stopped after {0} steps without a final answer")]
    StepLimitExceeded(usize),

    /// The transcript ended without a single assistant-authored message
    #[error("No assistant response produced")]
    NoAssistantResponse,
}

impl AgentError {
    /// Map an HTTP status and body into a typed error
    pub fn from_http_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 => AgentError::Unauthorized(body),
            429 => AgentError::RateLimited(body),
            400 => AgentError::BadRequest(body),
            500..=599 => AgentError::ServiceError(body),
            _ => AgentError::InvalidResponse(format!("HTTP {}: {}", status, body)),
        }
    }

    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AgentError::Network(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            AgentError::Network(format!("Connection failed: {}", e))
        } else if let Some(status) = e.status() {
            Self::from_http_status(status, e.to_string())
        } else if e.is_decode() {
            AgentError::InvalidResponse(e.to_string())
        } else {
            AgentError::Network(e.to_string())
        }
    }

    pub fn tool(name: impl Into<String>, message: impl Into<String>) -> Self {
        AgentError::Tool {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        let err = AgentError::from_http_status(
            reqwest::StatusCode::UNAUTHORIZED,
            "Invalid API Key".to_string(),
        );
        assert!(matches!(err, AgentError::Unauthorized(_)));

        let err = AgentError::from_http_status(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            "slow down".to_string(),
        );
        assert!(matches!(err, AgentError::RateLimited(_)));

        let err = AgentError::from_http_status(
            reqwest::StatusCode::BAD_GATEWAY,
            "upstream".to_string(),
        );
        assert!(matches!(err, AgentError::ServiceError(_)));

        let err = AgentError::from_http_status(reqwest::StatusCode::NOT_FOUND, "nope".to_string());
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_no_assistant_response_message() {
        assert_eq!(
            AgentError::NoAssistantResponse.to_string(),
            "No assistant response produced"
        );
    }
}
