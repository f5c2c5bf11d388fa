//! Request handlers.
//!
//! Handlers delegate to the repositories in `portal_db` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod requests;
pub mod scripts;

use axum::body::Body;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Generated scripts are rendered in-process and always UTF-8.
pub(crate) const GENERATED_SCRIPT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Utility scripts are served as stored; their encoding is not ours to claim.
pub(crate) const UTILITY_SCRIPT_CONTENT_TYPE: &str = "text/plain";

/// Build a plain-text attachment response for a script download.
pub(crate) fn script_attachment(
    filename: &str,
    content_type: &'static str,
    content: impl Into<Body>,
) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", sanitize_filename(filename));
    // Sanitized names are always valid header text; fall back just in case.
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (CONTENT_DISPOSITION, disposition),
        ],
        content.into(),
    )
        .into_response()
}

/// Keep only characters that are safe inside a quoted header parameter.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
