//! Route definitions for the `/requests` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::requests;
use crate::state::AppState;

/// Routes mounted at `/requests`.
///
/// ```text
/// GET    /                 -> list_requests
/// POST   /                 -> create_request
/// GET    /{id}             -> get_request
/// PATCH  /{id}/status      -> update_status
/// GET    /{id}/script      -> download_script
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(requests::list_requests).post(requests::create_request),
        )
        .route("/{id}", get(requests::get_request))
        .route("/{id}/status", patch(requests::update_status))
        .route("/{id}/script", get(requests::download_script))
}
