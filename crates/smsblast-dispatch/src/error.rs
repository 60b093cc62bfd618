use thiserror::Error;

/// Errors from the dispatch coordinator.
///
/// Per-recipient provider failures never appear here; they are folded into
/// the batch report as status strings. Only store I/O escapes as an error.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Store error: {0}")]
    Store(#[from] smsblast_store::StoreError),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
