//! Failure kinds of the indexing and query paths.
//!
//! Only [`EngineError::Persist`] ever reaches a caller of
//! [`SearchEngine`](crate::SearchEngine); the others are logged and degrade to an
//! empty contribution.

use crate::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A document could not be read while indexing; it contributes no terms.
    #[error("document {path} is unreadable: {source}")]
    DocumentUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The persisted index is missing or malformed; queries see an empty corpus.
    #[error("index unavailable: {0}")]
    IndexUnavailable(#[source] StoreError),
    /// The indexing root does not exist or is not a directory.
    #[error("invalid index root {0}")]
    InvalidRoot(PathBuf),
    #[error("failed to persist index: {0}")]
    Persist(#[source] StoreError),
}
