use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("library root {0:?} does not exist")]
    MissingRoot(PathBuf),

    #[error("invalid folder pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid exclude glob: {0}")]
    InvalidGlob(#[from] globset::Error),

    #[error(transparent)]
    Store(#[from] storage::StoreError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
