use chrono::{DateTime, Utc};
use serde::Serialize;
use smsblast_core::SenderIdentity;

/// An immediate send to one recipient.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub to: String,
    pub body: String,
    pub sender: SenderIdentity,
    pub media_url: Option<String>,
}

/// A future-dated send to one recipient. Scheduling requires a
/// messaging-service SID, so the sender is not a [`SenderIdentity`] here.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub to: String,
    pub body: String,
    pub service_sid: String,
    /// Absolute instant, already normalized to UTC by the caller.
    pub send_at: DateTime<Utc>,
    pub media_url: Option<String>,
}

/// What the provider returns for an accepted send (immediate or scheduled).
#[derive(Debug, Clone)]
pub struct SentMessage {
    /// Provider-issued message SID. The only handle for later correlation.
    pub sid: String,
    pub status: String,
}

/// One remote message record from a list query.
///
/// Note what is missing: the provider does not echo the intended send
/// instant. That lives only in the local metadata store.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteMessage {
    pub sid: String,
    pub to: String,
    pub status: String,
    pub date_created: Option<String>,
    pub messaging_service_sid: Option<String>,
    pub body: String,
    pub num_media: u32,
}
