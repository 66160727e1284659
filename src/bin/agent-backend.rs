use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use multi_agent_launcher::agent::AgentFactory;
use multi_agent_launcher::config::Settings;
use multi_agent_launcher::error::AppError;
use multi_agent_launcher::logging;
use multi_agent_launcher::routes::create_routes;
use multi_agent_launcher::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let settings = Arc::new(Settings::load()?);
    if settings.groq_api_key.is_none() {
        tracing::warn!("GROQ_API_KEY is not set; every /chat request will fail");
    }

    let components = Arc::new(AgentFactory::new(settings.clone())?);
    let app = create_routes(AppState::new(settings.clone(), components));

    let addr = settings.backend_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::server(format!("Failed to bind {}", addr), e))?;
    info!("Starting backend on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::server("Backend server stopped", e))?;

    Ok(())
}
