use std::sync::Arc;

use crate::agent::AgentComponents;
use crate::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub components: Arc<dyn AgentComponents>,
}

impl AppState {
    pub fn new(settings: Arc<Settings>, components: Arc<dyn AgentComponents>) -> Self {
        Self {
            settings,
            components,
        }
    }
}
