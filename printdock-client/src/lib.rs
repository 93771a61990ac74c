//! PrintDock Client - dashboard client for the printer service
//!
//! - [`PrinterClient`]: typed REST calls for one shop
//! - [`PrinterBoard`]: printer list with optimistic toggles and
//!   latest-wins refresh sequencing
//! - [`Dashboard`] / [`RefreshWorker`]: the controller a UI drives, plus
//!   its background poller

pub mod api;
pub mod board;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod worker;

pub use api::{PrinterApi, PrinterClient};
pub use board::{CommandState, PrinterBoard, RefreshTicket, StatusCommand};
pub use config::ClientConfig;
pub use dashboard::{Dashboard, Notice, ToggleOutcome};
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use worker::RefreshWorker;

// Re-export shared types for convenience
pub use shared::models::{DisplayPrinter, ManualStatus, OverrideDraft, PrinterRecord};
