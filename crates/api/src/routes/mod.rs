pub mod health;
pub mod requests;
pub mod scripts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /requests                      list, create
/// /requests/{id}                 get
/// /requests/{id}/status          update status (PATCH)
/// /requests/{id}/script          download generated script
///
/// /scripts/{kind}                download a utility script
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Service account requests and their generated scripts.
        .nest("/requests", requests::router())
        // Static helper scripts (prerequisites, KDS root key, validation).
        .nest("/scripts", scripts::router())
}
