//! Print job API Handlers

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use shared::error::{ApiResponse, AppResult};
use shared::models::{JobAssign, JobCompletion, JobTicket};

use crate::state::ServerState;

/// POST /shops/{shop_id}/printers/{printer_id}/jobs
///
/// The body is optional; a job id is generated when none is given.
pub async fn start(
    State(state): State<ServerState>,
    Path((shop_id, printer_id)): Path<(String, String)>,
    payload: Result<Json<JobAssign>, JsonRejection>,
) -> AppResult<ApiResponse<JobTicket>> {
    let assign = match payload {
        Ok(Json(assign)) => assign,
        Err(JsonRejection::MissingJsonContentType(_)) => JobAssign::default(),
        Err(rejection) => return Err(crate::api::rejection_error(rejection)),
    };
    let ticket = state
        .registry
        .start_job(&shop_id, &printer_id, assign.job_id)?;
    Ok(ApiResponse::success(ticket))
}

/// POST /shops/{shop_id}/printers/{printer_id}/jobs/{job_id}/complete
pub async fn complete(
    State(state): State<ServerState>,
    Path((shop_id, printer_id, job_id)): Path<(String, String, String)>,
) -> AppResult<ApiResponse<JobCompletion>> {
    let completion = state
        .registry
        .complete_job(&shop_id, &printer_id, &job_id)?;
    Ok(ApiResponse::success(completion))
}
