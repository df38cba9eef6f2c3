// File: crates/chart-store/src/error.rs
// Summary: Error type for local persistence.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("drawings blob is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
