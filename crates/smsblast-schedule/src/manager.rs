use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use smsblast_core::ProviderSettings;
use smsblast_provider::{ScheduleRequest, SmsProvider};
use smsblast_store::MessageStore;
use tracing::{debug, info, warn};

use crate::error::{Result, ScheduleError};
use crate::types::{ScheduleOutcome, ScheduleReport, ScheduledView};

/// Display cap for remote message bodies in list views.
const PREVIEW_MAX_CHARS: usize = 120;
/// Provider status filter for pending scheduled messages.
const SCHEDULED: &str = "scheduled";
/// Provider status requested (and expected back) on cancellation.
const CANCELED: &str = "canceled";

/// Drives schedule-create / list / cancel, reconciling the provider's
/// records with the local intent metadata.
pub struct ScheduleManager {
    provider: Arc<dyn SmsProvider>,
    store: Arc<MessageStore>,
    settings: ProviderSettings,
}

impl ScheduleManager {
    pub fn new(
        provider: Arc<dyn SmsProvider>,
        store: Arc<MessageStore>,
        settings: ProviderSettings,
    ) -> Self {
        Self {
            provider,
            store,
            settings,
        }
    }

    /// Schedule `content` for every recipient at `send_at_iso`.
    ///
    /// Sequential like the send-now path. Each successful create upserts
    /// the metadata row before the loop moves on; the SID is otherwise
    /// unrecoverable for later correlation. A metadata write failure is
    /// recorded on the outcome but cannot undo the remote create, so the
    /// SID is still reported.
    ///
    /// An empty recipient list yields an empty report with `ok = true`.
    pub async fn create(
        &self,
        recipients: &[String],
        content: &str,
        media_url: Option<&str>,
        send_at_iso: &str,
    ) -> Result<ScheduleReport> {
        let (_, sender) = self
            .settings
            .resolved()
            .ok_or(ScheduleError::MissingSettings)?;
        let service_sid = sender
            .service_sid()
            .ok_or(ScheduleError::NotMessagingService)?;

        let send_at: DateTime<Utc> = DateTime::parse_from_rfc3339(send_at_iso)
            .map_err(|e| ScheduleError::InvalidSendAt(e.to_string()))?
            .with_timezone(&Utc);
        let send_at_norm = send_at.to_rfc3339();
        let body = content.trim();

        let mut results = Vec::with_capacity(recipients.len());
        for to in recipients {
            let req = ScheduleRequest {
                to: to.clone(),
                body: body.to_string(),
                service_sid: service_sid.to_string(),
                send_at,
                media_url: media_url.map(String::from),
            };
            match self.provider.schedule_send(&req).await {
                Ok(sent) => {
                    debug!(%to, sid = %sent.sid, send_at = %send_at_norm, "scheduled");
                    let meta_error = self
                        .store
                        .upsert_scheduled_meta(&sent.sid, &send_at_norm)
                        .err();
                    if let Some(ref e) = meta_error {
                        warn!(sid = %sent.sid, error = %e, "scheduled but metadata write failed");
                    }
                    results.push(ScheduleOutcome {
                        to: to.clone(),
                        sid: Some(sent.sid),
                        error: meta_error.map(|e| e.to_string()),
                    });
                }
                Err(e) => {
                    warn!(%to, error = %e, "schedule create failed");
                    results.push(ScheduleOutcome {
                        to: to.clone(),
                        sid: None,
                        error: Some(e.recipient_text()),
                    });
                }
            }
        }

        let ok = results.iter().all(|r| r.sid.is_some());
        info!(ok, recipients = results.len(), "schedule create complete");
        Ok(ScheduleReport { ok, results })
    }

    /// Remote `scheduled` records merged with local intent metadata.
    ///
    /// The metadata table is read in full: it holds one small row per
    /// scheduled send, so a lookup map is cheaper than per-SID queries.
    /// No remote records and no local rows are both valid empty results.
    pub async fn list(&self, page_size: u32) -> Result<Vec<ScheduledView>> {
        let remote = self.provider.list_scheduled(SCHEDULED, page_size).await?;

        let send_at_by_sid: HashMap<String, String> = self
            .store
            .list_scheduled_meta()?
            .into_iter()
            .map(|m| (m.sid, m.send_at_iso))
            .collect();

        let views = remote
            .into_iter()
            .map(|msg| {
                let send_at_iso = send_at_by_sid.get(&msg.sid).cloned();
                ScheduledView {
                    body_preview: truncate_preview(&msg.body),
                    sid: msg.sid,
                    to: msg.to,
                    status: msg.status,
                    date_created: msg.date_created,
                    messaging_service_sid: msg.messaging_service_sid,
                    num_media: msg.num_media,
                    send_at_iso,
                }
            })
            .collect();
        Ok(views)
    }

    /// Request cancellation of one scheduled message.
    ///
    /// Succeeds only when the provider echoes `canceled` back; anything
    /// else (already fired, unknown SID, transport failure) is reported as
    /// [`ScheduleError::CancelRejected`] with the provider's wording.
    ///
    /// The local metadata row is retained: the provider forgets the
    /// intended send time on cancellation, so deleting the row would erase
    /// the only audit record.
    pub async fn cancel(&self, sid: &str) -> Result<()> {
        self.settings
            .resolved()
            .ok_or(ScheduleError::MissingSettings)?;
        let sid = sid.trim();
        if sid.is_empty() {
            return Err(ScheduleError::InvalidSid);
        }

        match self.provider.update_status(sid, CANCELED).await {
            Ok(status) if status == CANCELED => {
                info!(%sid, "scheduled message canceled");
                Ok(())
            }
            Ok(status) => Err(ScheduleError::CancelRejected {
                message: format!("provider returned status '{status}'"),
            }),
            Err(e) => Err(ScheduleError::CancelRejected {
                message: e.to_string(),
            }),
        }
    }
}

/// Bounded, char-boundary-safe preview of a message body.
fn truncate_preview(body: &str) -> String {
    if body.chars().count() <= PREVIEW_MAX_CHARS {
        body.to_string()
    } else {
        body.chars().take(PREVIEW_MAX_CHARS).collect()
    }
}
