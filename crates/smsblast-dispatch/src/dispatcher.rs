use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use smsblast_core::ProviderSettings;
use smsblast_provider::{SendRequest, SmsProvider};
use smsblast_store::{BatchStatus, MessageBatch, MessageStore};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Per-recipient status when no network call was attempted.
pub const MISSING_SETTINGS: &str = "❌ Missing Twilio settings";

/// Aggregate outcome of one send-now invocation.
///
/// Keyed by recipient, so ordering carries no meaning; `ok + fail` always
/// equals the number of recipients processed.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub results: BTreeMap<String, String>,
    pub ok: usize,
    pub fail: usize,
}

impl BatchReport {
    /// The log label this report earns: `sent` if nothing failed, `failed`
    /// if nothing succeeded, `partial` otherwise.
    pub fn derived_status(&self) -> BatchStatus {
        if self.fail == 0 {
            BatchStatus::Sent
        } else if self.ok == 0 {
            BatchStatus::Failed
        } else {
            BatchStatus::Partial
        }
    }

    /// Failure summary for the log row; `None` when everything succeeded.
    pub fn error_summary(&self) -> Option<String> {
        (self.fail > 0).then(|| format!("failed: {}", self.fail))
    }
}

/// Drives the send-now path: sequential per-recipient sends, result
/// aggregation, and explicit batch persistence.
pub struct Dispatcher {
    provider: Arc<dyn SmsProvider>,
    store: Arc<MessageStore>,
    settings: ProviderSettings,
}

impl Dispatcher {
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

    /// Send `body` to every recipient, one at a time in input order.
    ///
    /// One recipient's failure never blocks the rest; each outcome becomes
    /// a status string in the report. With credentials or sender identity
    /// missing, every recipient is marked [`MISSING_SETTINGS`] and the
    /// provider is never called.
    ///
    /// Duplicate recipients are collapsed before the loop (first-seen order
    /// kept), so the report holds exactly one entry per unique recipient.
    pub async fn send_batch(
        &self,
        recipients: &[String],
        body: &str,
        media_url: Option<&str>,
    ) -> BatchReport {
        let unique = dedupe(recipients);

        let Some((_, sender)) = self.settings.resolved() else {
            warn!(
                recipients = unique.len(),
                "send refused: provider settings incomplete"
            );
            let results: BTreeMap<String, String> = unique
                .into_iter()
                .map(|to| (to, MISSING_SETTINGS.to_string()))
                .collect();
            let fail = results.len();
            return BatchReport {
                results,
                ok: 0,
                fail,
            };
        };

        let mut results = BTreeMap::new();
        let mut ok = 0usize;
        let mut fail = 0usize;

        for to in unique {
            let req = SendRequest {
                to: to.clone(),
                body: body.to_string(),
                sender: sender.clone(),
                media_url: media_url.map(String::from),
            };
            match self.provider.send(&req).await {
                Ok(sent) => {
                    debug!(%to, sid = %sent.sid, status = %sent.status, "recipient accepted");
                    results.insert(to, "✅ Sent".to_string());
                    ok += 1;
                }
                Err(e) => {
                    warn!(%to, error = %e, "recipient failed");
                    results.insert(to, format!("❌ {}", e.recipient_text()));
                    fail += 1;
                }
            }
        }

        info!(ok, fail, "batch dispatch complete");
        BatchReport { results, ok, fail }
    }

    /// Append one row to the batch log. Kept separate from [`send_batch`]
    /// so the caller picks the status label after inspecting the report,
    /// and so a store failure can never swallow an already-completed send.
    pub fn record_batch(
        &self,
        content: &str,
        recipient_count: u32,
        status: BatchStatus,
        error_message: Option<&str>,
    ) -> Result<i64> {
        let id = self
            .store
            .insert_batch(content, recipient_count, status, error_message)?;
        Ok(id)
    }

    /// Batch history, most recent first.
    pub fn list_batches(&self) -> Result<Vec<MessageBatch>> {
        Ok(self.store.list_batches()?)
    }
}

/// First-seen-order de-duplication of the recipient list.
fn dedupe(recipients: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    recipients
        .iter()
        .filter(|r| seen.insert(r.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use smsblast_core::{Credentials, SenderIdentity};
    use smsblast_provider::{
        ProviderError, RemoteMessage, ScheduleRequest, SentMessage,
    };

    /// Scripted provider: fails the configured recipients, counts calls.
    struct ScriptedProvider {
        fail_with: HashMap<String, String>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(fail_with: &[(&str, &str)]) -> Self {
            Self {
                fail_with: fail_with
                    .iter()
                    .map(|(to, msg)| (to.to_string(), msg.to_string()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SmsProvider for ScriptedProvider {
        async fn send(
            &self,
            req: &SendRequest,
        ) -> std::result::Result<SentMessage, ProviderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_with.get(&req.to) {
                Some(msg) => Err(ProviderError::Api {
                    status: 400,
                    message: msg.clone(),
                }),
                None => Ok(SentMessage {
                    sid: format!("SM{n:04}"),
                    status: "queued".to_string(),
                }),
            }
        }

        async fn schedule_send(
            &self,
            _req: &ScheduleRequest,
        ) -> std::result::Result<SentMessage, ProviderError> {
            unreachable!("dispatch tests never schedule")
        }

        async fn list_scheduled(
            &self,
            _status: &str,
            _page_size: u32,
        ) -> std::result::Result<Vec<RemoteMessage>, ProviderError> {
            unreachable!("dispatch tests never list")
        }

        async fn update_status(
            &self,
            _sid: &str,
            _new_status: &str,
        ) -> std::result::Result<String, ProviderError> {
            unreachable!("dispatch tests never cancel")
        }
    }

    fn configured_settings() -> ProviderSettings {
        ProviderSettings {
            credentials: Some(Credentials {
                account_sid: "AC123".into(),
                auth_token: "token".into(),
            }),
            sender: SenderIdentity::resolve("+15550001111"),
        }
    }

    fn memory_store() -> Arc<MessageStore> {
        Arc::new(MessageStore::new(rusqlite::Connection::open_in_memory().unwrap()).unwrap())
    }

    fn dispatcher(provider: Arc<ScriptedProvider>, settings: ProviderSettings) -> Dispatcher {
        Dispatcher::new(provider, memory_store(), settings)
    }

    fn recipients(nums: &[&str]) -> Vec<String> {
        nums.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn partial_failure_is_isolated_per_recipient() {
        let provider = Arc::new(ScriptedProvider::new(&[("+15551110001", "invalid number")]));
        let d = dispatcher(provider.clone(), configured_settings());

        let report = d
            .send_batch(
                &recipients(&["+15551110000", "+15551110001"]),
                "Hello",
                None,
            )
            .await;

        assert_eq!(report.results["+15551110000"], "✅ Sent");
        assert_eq!(report.results["+15551110001"], "❌ invalid number");
        assert_eq!(report.ok, 1);
        assert_eq!(report.fail, 1);
        assert_eq!(provider.call_count(), 2);
        assert_eq!(report.derived_status(), BatchStatus::Partial);
        assert_eq!(report.error_summary().as_deref(), Some("failed: 1"));
    }

    #[tokio::test]
    async fn partial_batch_is_recorded_with_summary() {
        let provider = Arc::new(ScriptedProvider::new(&[("+15551110001", "invalid number")]));
        let store = memory_store();
        let d = Dispatcher::new(provider, store.clone(), configured_settings());

        let report = d
            .send_batch(
                &recipients(&["+15551110000", "+15551110001"]),
                "Hello",
                None,
            )
            .await;
        d.record_batch(
            "Hello",
            report.results.len() as u32,
            report.derived_status(),
            report.error_summary().as_deref(),
        )
        .unwrap();

        let batches = store.list_batches().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].recipient_count, 2);
        assert_eq!(batches[0].status, BatchStatus::Partial);
        assert_eq!(batches[0].error_message.as_deref(), Some("failed: 1"));
    }

    #[tokio::test]
    async fn missing_settings_makes_zero_provider_calls() {
        let provider = Arc::new(ScriptedProvider::new(&[]));
        let d = dispatcher(provider.clone(), ProviderSettings::default());

        let report = d
            .send_batch(&recipients(&["+15551110000", "+15551110001"]), "Hi", None)
            .await;

        assert_eq!(provider.call_count(), 0);
        assert_eq!(report.results.len(), 2);
        for status in report.results.values() {
            assert_eq!(status, MISSING_SETTINGS);
        }
        assert_eq!(report.ok, 0);
        assert_eq!(report.fail, 2);
        assert_eq!(report.derived_status(), BatchStatus::Failed);
    }

    #[tokio::test]
    async fn counts_cover_every_unique_recipient() {
        let provider = Arc::new(ScriptedProvider::new(&[("+15550000002", "blocked")]));
        let d = dispatcher(provider.clone(), configured_settings());

        // "+15550000001" appears twice; it is sent once and reported once.
        let report = d
            .send_batch(
                &recipients(&[
                    "+15550000001",
                    "+15550000002",
                    "+15550000001",
                    "+15550000003",
                ]),
                "ping",
                None,
            )
            .await;

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.ok + report.fail, 3);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn all_failed_batch_derives_failed_status() {
        let provider = Arc::new(ScriptedProvider::new(&[("+15550000009", "unreachable")]));
        let d = dispatcher(provider, configured_settings());

        let report = d
            .send_batch(&recipients(&["+15550000009"]), "down?", None)
            .await;
        assert_eq!(report.derived_status(), BatchStatus::Failed);

        // All-success derives `sent` with no summary.
        let clean = BatchReport {
            results: BTreeMap::new(),
            ok: 4,
            fail: 0,
        };
        assert_eq!(clean.derived_status(), BatchStatus::Sent);
        assert_eq!(clean.error_summary(), None);
    }

    #[tokio::test]
    async fn list_batches_reads_through_to_store() {
        let provider = Arc::new(ScriptedProvider::new(&[]));
        let store = memory_store();
        let d = Dispatcher::new(provider, store, configured_settings());

        d.record_batch("a", 1, BatchStatus::Sent, None).unwrap();
        d.record_batch("b", 2, BatchStatus::Failed, Some("failed: 2"))
            .unwrap();

        let batches = d.list_batches().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].content, "b");
    }
}
