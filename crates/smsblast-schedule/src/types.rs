use serde::Serialize;

/// Result of one recipient's schedule-create attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOutcome {
    pub to: String,
    /// Provider-issued SID; present iff the create succeeded.
    pub sid: Option<String>,
    pub error: Option<String>,
}

/// Aggregate result of a schedule-create call.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    /// True iff every recipient yielded a SID (vacuously true when empty).
    pub ok: bool,
    pub results: Vec<ScheduleOutcome>,
}

/// One scheduled message as shown to the operator: the remote record
/// merged with locally-retained intent.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledView {
    pub sid: String,
    pub to: String,
    pub status: String,
    pub date_created: Option<String>,
    pub messaging_service_sid: Option<String>,
    /// Remote body truncated for display; stored data is never mutated.
    pub body_preview: String,
    pub num_media: u32,
    /// `None` only when no local metadata exists for this SID (scheduled
    /// through a path that bypassed this engine).
    pub send_at_iso: Option<String>,
}
