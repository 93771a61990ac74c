//! Agent API module
//!
//! The shop's local agent posts a heartbeat with every printer it sees and
//! receives queued force-sync requests in the reply.

mod handler;

use axum::{Router, routing::post};

use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/shops/{shop_id}/agent/report", post(handler::report))
}
