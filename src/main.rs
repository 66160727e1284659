use anyhow::Result;
use tracing::{error, info};

use multi_agent_launcher::config::Settings;
use multi_agent_launcher::launcher::Supervisor;
use multi_agent_launcher::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let settings = Settings::load()?;
    info!(
        "Launching backend on {} (output in {}) and frontend after {:?}",
        settings.backend_addr(),
        settings.backend_log_file,
        settings.frontend_delay()
    );

    let supervisor = Supervisor::from_settings(&settings)?;
    if let Err(e) = supervisor.run().await {
        error!("Launcher stopped: {}", e);
    }

    Ok(())
}
