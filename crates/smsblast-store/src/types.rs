use serde::Serialize;

/// Outcome label for a logged batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Row created before any outcome is known (schema default).
    Pending,
    /// Every recipient accepted.
    Sent,
    /// Some recipients accepted, some failed.
    Partial,
    /// No recipient accepted.
    Failed,
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BatchStatus::Pending => "pending",
            BatchStatus::Sent => "sent",
            BatchStatus::Partial => "partial",
            BatchStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for BatchStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BatchStatus::Pending),
            "sent" => Ok(BatchStatus::Sent),
            "partial" => Ok(BatchStatus::Partial),
            "failed" => Ok(BatchStatus::Failed),
            other => Err(format!("unknown batch status: {other}")),
        }
    }
}

/// One send-now invocation, logged after its dispatch loop finished.
#[derive(Debug, Clone, Serialize)]
pub struct MessageBatch {
    /// Store-assigned rowid.
    pub id: i64,
    pub content: String,
    /// Store-assigned creation timestamp (`CURRENT_TIMESTAMP`).
    pub send_time: String,
    pub status: BatchStatus,
    pub recipient_count: u32,
    /// Failure summary; `None` unless status is partial/failed.
    pub error_message: Option<String>,
}

/// Locally-retained scheduling intent for one provider-issued SID.
///
/// The provider does not return the caller's intended send instant when
/// listing, and forgets it entirely after cancellation. This row is the
/// only place it survives.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledMeta {
    pub sid: String,
    pub send_at_iso: String,
    pub created_at: String,
}
