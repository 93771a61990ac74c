//! Print job API module
//!
//! Tracks which jobs are in flight per printer. Completion is the only
//! event that settles a pending turn-off.

mod handler;

use axum::{Router, routing::post};

use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/shops/{shop_id}/printers/{printer_id}/jobs",
            post(handler::start),
        )
        .route(
            "/shops/{shop_id}/printers/{printer_id}/jobs/{job_id}/complete",
            post(handler::complete),
        )
}
