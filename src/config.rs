use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::AppError;

/// Process-wide settings, read once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default)]
    pub tavily_api_key: Option<String>,
    #[serde(default = "default_allowed_model_names")]
    pub allowed_model_names: Vec<String>,
    #[serde(default = "default_groq_base_url")]
    pub groq_base_url: String,
    #[serde(default = "default_tavily_base_url")]
    pub tavily_base_url: String,
    #[serde(default = "default_backend_host")]
    pub backend_host: String,
    #[serde(default = "default_backend_port")]
    pub backend_port: u16,
    #[serde(default = "default_frontend_delay_ms")]
    pub frontend_delay_ms: u64,
    #[serde(default = "default_agent_step_limit")]
    pub agent_step_limit: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_backend_log_file")]
    pub backend_log_file: String,
    #[serde(default)]
    pub groq_temperature: Option<f32>,
}

fn default_allowed_model_names() -> Vec<String> {
    vec![
        "llama3-70b-8192".to_string(),
        "llama-3.3-70b-versatile".to_string(),
    ]
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_tavily_base_url() -> String {
    "https://api.tavily.com".to_string()
}

fn default_backend_host() -> String {
    "127.0.0.1".to_string()
}

fn default_backend_port() -> u16 {
    9999
}

fn default_frontend_delay_ms() -> u64 {
    2000
}

fn default_agent_step_limit() -> usize {
    25
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_backend_log_file() -> String {
    "agent-backend.log".to_string()
}

impl Settings {
    /// Load settings: `.env` first, then an optional config file
    /// (`CONFIG_PATH`, else `conf.{yaml,json,toml}`), then the environment.
    pub fn load() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "conf".to_string());
        Self::from_sources(Some(Path::new(&path)), true)
    }

    pub(crate) fn from_sources(file: Option<&Path>, with_env: bool) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();

        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).required(false));
        }

        if with_env {
            builder = builder.add_source(
                config::Environment::default()
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_model_names"),
            );
        }

        let settings: Settings = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::config("Failed to load settings", e))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.allowed_model_names.is_empty() {
            return Err(AppError::Config {
                context: "allowed_model_names must not be empty".to_string(),
                source: None,
            });
        }
        Ok(())
    }

    pub fn is_model_allowed(&self, model_name: &str) -> bool {
        self.allowed_model_names.iter().any(|m| m == model_name)
    }

    pub fn backend_addr(&self) -> String {
        format!("{}:{}", self.backend_host, self.backend_port)
    }

    pub fn backend_url(&self) -> String {
        format!("http://{}", self.backend_addr())
    }

    pub fn frontend_delay(&self) -> Duration {
        Duration::from_millis(self.frontend_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            tavily_api_key: None,
            allowed_model_names: default_allowed_model_names(),
            groq_base_url: default_groq_base_url(),
            tavily_base_url: default_tavily_base_url(),
            backend_host: default_backend_host(),
            backend_port: default_backend_port(),
            frontend_delay_ms: default_frontend_delay_ms(),
            agent_step_limit: default_agent_step_limit(),
            request_timeout_secs: default_request_timeout_secs(),
            backend_log_file: default_backend_log_file(),
            groq_temperature: None,
        }
    }
}
