//! Terminal chat UI talking to the backend over HTTP.

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::backend_client::{BackendClient, ChatOutcome, ChatRequest};

const HELP: &str = "\
Commands:
  /model <name>     switch model
  /models           list available models
  /system <prompt>  set the agent's system prompt
  /search on|off    allow or forbid web search
  /help             show this help
  /quit             exit
Anything else is sent to the agent as a query.";

/// One line of user input, interpreted
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Model(String),
    Models,
    System(String),
    Search(bool),
    Help,
    Quit,
    Ask(String),
    Empty,
    Invalid(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if !line.starts_with('/') {
        return Input::Ask(line.to_string());
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match (command, rest) {
        ("/model", "") => Input::Invalid("usage: /model <name>".to_string()),
        ("/model", name) => Input::Model(name.to_string()),
        ("/models", _) => Input::Models,
        ("/system", prompt) => Input::System(prompt.to_string()),
        ("/search", "on") => Input::Search(true),
        ("/search", "off") => Input::Search(false),
        ("/search", _) => Input::Invalid("usage: /search on|off".to_string()),
        ("/help", _) => Input::Help,
        ("/quit" | "/exit", _) => Input::Quit,
        _ => Input::Invalid(format!("unknown command {}, try /help", command)),
    }
}

/// What the user has picked so far
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub model: String,
    pub system_prompt: String,
    pub allow_search: bool,
    allowed_models: Vec<String>,
}

impl ChatSession {
    pub fn new(allowed_models: Vec<String>) -> Self {
        Self {
            model: allowed_models.first().cloned().unwrap_or_default(),
            system_prompt: String::new(),
            allow_search: false,
            allowed_models,
        }
    }

    pub fn select_model(&mut self, name: &str) -> Result<(), String> {
        if !self.allowed_models.iter().any(|m| m == name) {
            return Err(format!(
                "unknown model {}, choose one of: {}",
                name,
                self.allowed_models.join(", ")
            ));
        }
        self.model = name.to_string();
        Ok(())
    }

    pub fn request(&self, query: &str) -> ChatRequest {
        ChatRequest {
            model_name: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
            messages: vec![query.to_string()],
            allow_search: self.allow_search,
        }
    }

    fn describe(&self) -> String {
        format!(
            "model: {} | web search: {} | system prompt: {}",
            self.model,
            if self.allow_search { "on" } else { "off" },
            if self.system_prompt.is_empty() {
                "(none)"
            } else {
                self.system_prompt.as_str()
            }
        )
    }
}

/// Read commands and queries from `input` until EOF or `/quit`
pub async fn run<R, W>(
    mut session: ChatSession,
    client: &BackendClient,
    input: R,
    out: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "AI agent chat ({})", client.base_url())?;
    match client.health_check().await {
        Ok(true) => {}
        Ok(false) | Err(_) => {
            warn!("Backend at {} is not answering health checks", client.base_url());
            writeln!(out, "warning: backend is not reachable yet")?;
        }
    }
    writeln!(out, "{}", session.describe())?;
    writeln!(out, "type /help for commands")?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Help => writeln!(out, "{}", HELP)?,
            Input::Models => writeln!(out, "{}", session.allowed_models.join("\n"))?,
            Input::Invalid(message) => writeln!(out, "{}", message)?,
            Input::Model(name) => match session.select_model(&name) {
                Ok(()) => writeln!(out, "{}", session.describe())?,
                Err(message) => writeln!(out, "{}", message)?,
            },
            Input::System(prompt) => {
                session.system_prompt = prompt;
                writeln!(out, "{}", session.describe())?;
            }
            Input::Search(enabled) => {
                session.allow_search = enabled;
                writeln!(out, "{}", session.describe())?;
            }
            Input::Ask(query) => {
                debug!(model = %session.model, "Sending query to backend");
                match client.chat(&session.request(&query)).await {
                    Ok(ChatOutcome::Answer(answer)) => {
                        writeln!(out, "Agent response:\n{}", answer)?;
                    }
                    Ok(ChatOutcome::Rejected { status, detail }) => {
                        writeln!(out, "Backend rejected the query ({}): {}", status, detail)?;
                    }
                    Err(e) => {
                        warn!("Error communicating with backend: {}", e);
                        writeln!(out, "Error communicating with backend: {}", e)?;
                    }
                }
            }
        }
    }

    writeln!(out, "bye")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;
    use axum::{routing::post, Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn models() -> Vec<String> {
        vec![
            "llama3-70b-8192".to_string(),
            "llama-3.3-70b-versatile".to_string(),
        ]
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("  "), Input::Empty);
        assert_eq!(parse_input("What is 2+2?"), Input::Ask("What is 2+2?".to_string()));
        assert_eq!(
            parse_input("/model llama3-70b-8192"),
            Input::Model("llama3-70b-8192".to_string())
        );
        assert_eq!(
            parse_input("/system You are a pirate"),
            Input::System("You are a pirate".to_string())
        );
        assert_eq!(parse_input("/system"), Input::System(String::new()));
        assert_eq!(parse_input("/search on"), Input::Search(true));
        assert_eq!(parse_input("/search off"), Input::Search(false));
        assert!(matches!(parse_input("/search maybe"), Input::Invalid(_)));
        assert!(matches!(parse_input("/model"), Input::Invalid(_)));
        assert!(matches!(parse_input("/frobnicate"), Input::Invalid(_)));
        assert_eq!(parse_input("/exit"), Input::Quit);
    }

    #[test]
    fn test_session_defaults_and_model_selection() {
        let mut session = ChatSession::new(models());
        assert_eq!(session.model, "llama3-70b-8192");
        assert!(!session.allow_search);

        assert!(session.select_model("gpt-4o").is_err());
        assert_eq!(session.model, "llama3-70b-8192");
        session.select_model("llama-3.3-70b-versatile").unwrap();

        let request = session.request("hi");
        assert_eq!(request.model_name, "llama-3.3-70b-versatile");
        assert_eq!(request.messages, vec!["hi".to_string()]);
    }

    #[tokio::test]
    async fn test_run_sends_session_settings_with_query() {
        let seen: Arc<Mutex<Vec<ChatRequest>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let router = Router::new().route(
            "/chat",
            post(move |Json(body): Json<ChatRequest>| {
                let sink = sink.clone();
                async move {
                    sink.lock().unwrap().push(body);
                    Json(json!({"response": "4"}))
                }
            }),
        );
        let base = serve(router).await;
        let client = BackendClient::new(reqwest::Client::new(), base);

        let script = "/search on\n/system Be brief\nWhat is 2+2?\n/quit\nnever sent\n";
        let mut out = Vec::new();
        run(ChatSession::new(models()), &client, script.as_bytes(), &mut out)
            .await
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Agent response:\n4"));
        // no /api/health route on the fake backend
        assert!(output.contains("warning: backend is not reachable yet"));

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].allow_search);
        assert_eq!(requests[0].system_prompt, "Be brief");
        assert_eq!(requests[0].messages, vec!["What is 2+2?".to_string()]);
    }
}
