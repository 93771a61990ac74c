//! API routes for printdock-server

pub mod agent;
pub mod health;
pub mod jobs;
pub mod printers;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::get;
use shared::error::{AppError, AppResult};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::state::ServerState;

/// Create the combined router
pub fn create_router(state: ServerState) -> Router {
    let timeout = state.config.request_timeout;

    Router::new()
        .route("/health", get(health::health_check))
        .merge(printers::router())
        .merge(jobs::router())
        .merge(agent::router())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Unwrap a JSON body, reporting malformed input in the API envelope
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(body)| body).map_err(rejection_error)
}

pub(crate) fn rejection_error(rejection: JsonRejection) -> AppError {
    AppError::invalid_request(rejection.body_text())
        .with_detail("status", rejection.status().as_u16())
}
