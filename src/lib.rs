pub mod agent;
pub mod backend_client;
pub mod config;
pub mod error;
pub mod frontend;
pub mod handlers;
pub mod launcher;
pub mod logging;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;
