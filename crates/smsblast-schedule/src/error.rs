use thiserror::Error;

/// Whole-operation errors from the schedule manager.
///
/// Per-recipient scheduling failures are data in the report, never errors;
/// these variants only cover preconditions and non-recipient-scoped calls.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Credentials or sender identity missing from configuration.
    #[error("provider settings are not configured")]
    MissingSettings,

    /// Scheduling requires a messaging-service sender (an `MG...` SID);
    /// a direct phone number cannot carry a send-at instant.
    #[error("scheduling requires a messaging service SID as the sender")]
    NotMessagingService,

    /// The requested send instant is not a valid RFC 3339 timestamp.
    #[error("invalid send-at instant: {0}")]
    InvalidSendAt(String),

    /// Empty or obviously malformed message SID.
    #[error("invalid message SID")]
    InvalidSid,

    /// The provider did not confirm the cancellation. Carries the
    /// provider's own message (e.g. the message already fired).
    #[error("cancel rejected: {message}")]
    CancelRejected { message: String },

    #[error("Provider error: {0}")]
    Provider(#[from] smsblast_provider::ProviderError),

    #[error("Store error: {0}")]
    Store(#[from] smsblast_store::StoreError),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
