//! Domain errors: an underlying fault plus the context it happened in

use thiserror::Error;

use crate::agent::error::AgentError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{context}")]
    Config {
        context: String,
        #[source]
        source: Option<config::ConfigError>,
    },

    #[error("Failed to start {service}: could not run `{command}`: {source}")]
    ServiceSpawn {
        service: String,
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start {service}: `{command}` exited with {}", describe_exit(.code))]
    ServiceExited {
        service: String,
        command: String,
        code: Option<i32>,
    },

    #[error("{context}: {source}")]
    Supervisor {
        context: String,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("{context}: {source}")]
    Server {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Agent {
        context: String,
        #[source]
        source: AgentError,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl AppError {
    pub fn config(context: impl Into<String>, source: config::ConfigError) -> Self {
        AppError::Config {
            context: context.into(),
            source: Some(source),
        }
    }

    pub fn agent(context: impl Into<String>, source: AgentError) -> Self {
        AppError::Agent {
            context: context.into(),
            source,
        }
    }

    pub fn server(context: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Server {
            context: context.into(),
            source,
        }
    }

    /// Exit code of a failed service, if the failure was a non-zero exit
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            AppError::ServiceExited { code, .. } => *code,
            _ => None,
        }
    }
}
