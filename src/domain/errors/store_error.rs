//! Response store error types.

use thiserror::Error;

/// Failures creating or maintaining a response store.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StoreError {
    #[error("failed to create cache dir {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode cache metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}
