//! PrintDock printer service
//!
//! REST service owning a shop's printer records in memory:
//! - accepts agent heartbeats (`agentDetected`, `lastUpdate`)
//! - applies operator overrides and on/off requests
//! - tracks in-flight jobs so a pending turn-off settles on completion
//! - relays force-sync requests to the agent

pub mod api;
pub mod config;
pub mod logger;
pub mod registry;
pub mod state;
pub mod watchdog;

pub use api::create_router;
pub use config::Config;
pub use registry::PrinterRegistry;
pub use state::ServerState;
pub use watchdog::AgentWatchdog;
