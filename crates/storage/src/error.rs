use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page {path:?} could not be read: {source}")]
    MissingPage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("page {path:?} has no `{block}` data block")]
    WriteTargetMissing { path: PathBuf, block: String },

    #[error("data block `{block}` in {path:?} is not plain JSON: {source}")]
    MalformedBlock {
        path: PathBuf,
        block: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
