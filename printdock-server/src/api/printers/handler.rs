//! Printer API Handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{
    DisplayPrinter, ManualStatusRequest, OverridePatch, PrinterRecord, StatusChange, SyncTicket,
};

use crate::api::json_body;
use crate::state::ServerState;

/// GET /shops/{shop_id}/printers
pub async fn list(
    State(state): State<ServerState>,
    Path(shop_id): Path<String>,
) -> AppResult<ApiResponse<Vec<PrinterRecord>>> {
    Ok(ApiResponse::success(state.registry.list(&shop_id)))
}

/// GET /shops/{shop_id}/printer-display - resolved view for thin consumers
pub async fn list_display(
    State(state): State<ServerState>,
    Path(shop_id): Path<String>,
) -> AppResult<ApiResponse<Vec<DisplayPrinter>>> {
    Ok(ApiResponse::success(state.registry.display(&shop_id)))
}

/// GET /shops/{shop_id}/printers/{printer_id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((shop_id, printer_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PrinterRecord>> {
    let record = state.registry.get(&shop_id, &printer_id)?;
    Ok(ApiResponse::success(record))
}

/// PATCH /shops/{shop_id}/printers/{printer_id} - merge manual override
pub async fn update_override(
    State(state): State<ServerState>,
    Path((shop_id, printer_id)): Path<(String, String)>,
    payload: Result<Json<OverridePatch>, JsonRejection>,
) -> AppResult<ApiResponse<PrinterRecord>> {
    let patch = json_body(payload)?;
    let record = state
        .registry
        .apply_override(&shop_id, &printer_id, &patch)?;
    Ok(ApiResponse::success(record))
}

/// PATCH /shops/{shop_id}/printers/{printer_id}/manualStatus
pub async fn set_manual_status(
    State(state): State<ServerState>,
    Path((shop_id, printer_id)): Path<(String, String)>,
    payload: Result<Json<ManualStatusRequest>, JsonRejection>,
) -> AppResult<ApiResponse<StatusChange>> {
    let request = json_body(payload)?;
    let change = state
        .registry
        .set_manual_status(&shop_id, &printer_id, &request.manual_status)?;

    let message = if change.redirected {
        "Printer has a job in flight; it will turn off when the job completes"
    } else {
        "OK"
    };
    Ok(ApiResponse::success_with_message(message, change))
}

/// POST /shops/{shop_id}/printers/{printer_id}/sync - pass-through to the agent
pub async fn force_sync(
    State(state): State<ServerState>,
    Path((shop_id, printer_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<SyncTicket>> {
    let now = chrono::Utc::now();
    let ticket = state.registry.request_sync(
        &shop_id,
        &printer_id,
        now,
        state.config.agent_cutoff(now),
    )?;
    Ok(ApiResponse::success(ticket))
}

/// DELETE /shops/{shop_id}/printers/{printer_id}
pub async fn delete(
    State(state): State<ServerState>,
    Path((shop_id, printer_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<PrinterRecord>> {
    let removed = state.registry.remove(&shop_id, &printer_id)?;
    Ok(ApiResponse::success(removed))
}
