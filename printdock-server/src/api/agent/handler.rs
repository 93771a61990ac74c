//! Agent API Handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{AgentReport, AgentReportAck};

use crate::api::json_body;
use crate::state::ServerState;

/// POST /shops/{shop_id}/agent/report
pub async fn report(
    State(state): State<ServerState>,
    Path(shop_id): Path<String>,
    payload: Result<Json<AgentReport>, JsonRejection>,
) -> AppResult<ApiResponse<AgentReportAck>> {
    let report = json_body(payload)?;
    let ack = state
        .registry
        .ingest_report(&shop_id, &report, chrono::Utc::now());
    Ok(ApiResponse::success(ack))
}
