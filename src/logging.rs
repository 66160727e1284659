use tracing_subscriber::EnvFilter;

// Binaries log under their own crate names, not the library's.
const DEFAULT_FILTER: &str = "info,multi_agent_launcher=debug,agent_launcher=debug,agent_backend=debug,agent_frontend=debug,tower_http=debug";

/// Install the process-wide subscriber. Call once, first thing in `main`.
/// `RUST_LOG` overrides the default filter.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .init();
}

/// Same as [`init`], but keeps stdout free for an interactive UI
pub fn init_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

pub(crate) fn default_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter())
}
