//! Error types for cart operations.

use thiserror::Error;

use crate::store::StoreError;

/// Error returned by [`CartEngine::apply`](super::CartEngine::apply).
///
/// Only persistence can fail. The in-memory cart has already been updated
/// when one of these is returned.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to persist cart: {0}")]
    Store(#[from] StoreError),

    #[error("failed to encode cart record: {0}")]
    Encode(#[from] serde_json::Error),
}
