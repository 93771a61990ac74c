//! Printer data models
//!
//! Wire types shared by the printer service and the dashboard client,
//! plus the pure reconciliation pipeline:
//! raw record → [`normalize`] → [`resolve`] → [`build_display`].

pub mod capability;
pub mod display;
pub mod patch;
pub mod printer;
pub mod status;

// Re-exports
pub use capability::*;
pub use display::*;
pub use patch::*;
pub use printer::*;
pub use status::*;
