//! Printer API module

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::ServerState;

const BASE: &str = "/shops/{shop_id}/printers";
/// Resolved view; kept outside `BASE` so no printer id can shadow it
const DISPLAY: &str = "/shops/{shop_id}/printer-display";

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(BASE, get(handler::list))
        .route(DISPLAY, get(handler::list_display))
        .route(
            &format!("{BASE}/{{printer_id}}"),
            get(handler::get_by_id)
                .patch(handler::update_override)
                .delete(handler::delete),
        )
        .route(
            &format!("{BASE}/{{printer_id}}/manualStatus"),
            patch(handler::set_manual_status),
        )
        .route(
            &format!("{BASE}/{{printer_id}}/sync"),
            post(handler::force_sync),
        )
}
