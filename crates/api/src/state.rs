use std::sync::Arc;

use portal_db::RequestStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Handle to the request collection.
    pub store: RequestStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
