//! Handlers for service account requests.
//!
//! Submission validates and renders the script up front; later status
//! changes never touch the stored script.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use portal_core::account::AccountFields;
use portal_core::error::CoreError;
use portal_core::types::RequestId;
use portal_db::models::request::{ServiceAccountRequest, UpdateStatus};
use portal_db::repositories::RequestRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::{script_attachment, GENERATED_SCRIPT_CONTENT_TYPE};
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "ServiceAccountRequest";

fn not_found(id: RequestId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// Load a request or fail with 404.
pub async fn ensure_request_exists(
    state: &AppState,
    id: &str,
) -> AppResult<ServiceAccountRequest> {
    RequestRepo::find_by_id(&state.store, id)
        .await?
        .ok_or_else(|| not_found(id.to_string()))
}

/// GET /api/v1/requests
pub async fn list_requests(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let requests = RequestRepo::list_all(&state.store).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/requests
///
/// Validate the submission, render its script and persist it as `pending`.
pub async fn create_request(
    State(state): State<AppState>,
    Json(input): Json<AccountFields>,
) -> AppResult<impl IntoResponse> {
    let request = RequestRepo::create(&state.store, &input).await?;

    tracing::info!(
        request_id = %request.id,
        account_type = %request.fields.account_type,
        account_name = %request.fields.account_name,
        "Service account request submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/requests/{id}
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<RequestId>,
) -> AppResult<impl IntoResponse> {
    let request = ensure_request_exists(&state, &id).await?;
    Ok(Json(DataResponse { data: request }))
}

/// PATCH /api/v1/requests/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<RequestId>,
    Json(input): Json<UpdateStatus>,
) -> AppResult<impl IntoResponse> {
    let request = RequestRepo::update_status(&state.store, &id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        request_id = %request.id,
        status = request.status.as_str(),
        "Request status updated"
    );

    Ok(Json(DataResponse { data: request }))
}

/// GET /api/v1/requests/{id}/script
///
/// Serve the stored script as a `.ps1` attachment.
pub async fn download_script(
    State(state): State<AppState>,
    Path(id): Path<RequestId>,
) -> AppResult<impl IntoResponse> {
    let download = RequestRepo::find_script(&state.store, &id)
        .await?
        .ok_or_else(|| not_found(id.clone()))?;

    tracing::info!(request_id = %id, filename = %download.filename, "Script downloaded");

    Ok(script_attachment(
        &download.filename,
        GENERATED_SCRIPT_CONTENT_TYPE,
        download.content,
    ))
}
