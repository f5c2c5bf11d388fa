use axum::routing::get;
use axum::Router;

use crate::handlers::scripts;
use crate::state::AppState;

/// Routes mounted at `/scripts`.
///
/// ```text
/// GET    /{kind}           -> download_utility_script
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{kind}", get(scripts::download_utility_script))
}
