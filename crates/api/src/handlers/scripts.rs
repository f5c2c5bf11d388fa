//! Handlers for the static utility scripts shipped next to the portal.

use std::io::ErrorKind;

use axum::extract::{Path, State};
use axum::response::IntoResponse;

use portal_core::error::CoreError;
use portal_core::naming::UtilityScript;

use crate::error::{AppError, AppResult};
use crate::handlers::{script_attachment, UTILITY_SCRIPT_CONTENT_TYPE};
use crate::state::AppState;

const ENTITY: &str = "UtilityScript";

/// GET /api/v1/scripts/{kind}
///
/// `kind` is one of `prerequisites`, `kds` or `validate`. Unknown kinds and
/// files missing from the scripts directory both answer 404. The file bytes
/// are sent unchanged, whatever their encoding.
pub async fn download_utility_script(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<impl IntoResponse> {
    let script = UtilityScript::from_slug(&kind).ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: ENTITY,
            id: kind.clone(),
        })
    })?;

    let path = state.config.scripts_dir.join(script.filename());
    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Utility script missing from scripts directory");
            return Err(AppError::Core(CoreError::NotFound {
                entity: ENTITY,
                id: kind,
            }));
        }
        Err(err) => {
            return Err(AppError::InternalError(format!(
                "Failed to read {}: {err}",
                path.display()
            )))
        }
    };

    tracing::debug!(kind = script.slug(), "Serving utility script");
    Ok(script_attachment(
        script.filename(),
        UTILITY_SCRIPT_CONTENT_TYPE,
        content,
    ))
}
