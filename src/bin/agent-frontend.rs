use anyhow::Result;
use tokio::io::BufReader;

use multi_agent_launcher::backend_client::BackendClient;
use multi_agent_launcher::config::Settings;
use multi_agent_launcher::frontend::{self, ChatSession};
use multi_agent_launcher::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_stderr();

    let settings = Settings::load()?;
    let http = reqwest::Client::builder()
        .timeout(settings.request_timeout())
        .build()?;
    let client = BackendClient::new(http, settings.backend_url());
    let session = ChatSession::new(settings.allowed_model_names.clone());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    frontend::run(session, &client, stdin, &mut stdout).await?;

    Ok(())
}
