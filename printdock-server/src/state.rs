//! Application state for printdock-server

use std::sync::Arc;

use crate::config::Config;
use crate::registry::PrinterRegistry;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub registry: PrinterRegistry,
}

impl ServerState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            registry: PrinterRegistry::new(),
        }
    }
}
