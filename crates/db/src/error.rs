use std::path::PathBuf;

use portal_core::error::CoreError;

/// Failures raised by the request store.
///
/// Storage failures are never retried or swallowed here; they propagate to
/// the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed request store {path}: {source}")]
    Serialization {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unsupported request store version {found} (this build reads up to {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The submission was rejected before anything was written.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
