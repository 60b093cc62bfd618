//! `smsblast-provider` — the messaging-provider seam.
//!
//! [`SmsProvider`] is the narrow async interface the dispatch and schedule
//! components call; [`TwilioClient`] is the production implementation over
//! the Twilio 2010-04-01 REST API. Tests substitute scripted mocks.

pub mod error;
pub mod twilio;
pub mod types;

use async_trait::async_trait;

pub use error::{ProviderError, Result};
pub use twilio::TwilioClient;
pub use types::{RemoteMessage, ScheduleRequest, SendRequest, SentMessage};

/// Common interface for a "fixed schedule at a future instant" style
/// messaging provider.
#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Send one message now.
    async fn send(&self, req: &SendRequest) -> Result<SentMessage>;

    /// Create one future-dated send; the returned SID is the caller's only
    /// handle for listing and cancellation.
    async fn schedule_send(&self, req: &ScheduleRequest) -> Result<SentMessage>;

    /// Up to `page_size` remote records filtered by provider status.
    async fn list_scheduled(&self, status: &str, page_size: u32) -> Result<Vec<RemoteMessage>>;

    /// Request a status transition for `sid` (e.g. `canceled`).
    /// Returns the status the provider echoed back.
    async fn update_status(&self, sid: &str, new_status: &str) -> Result<String>;
}
