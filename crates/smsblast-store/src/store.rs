use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::db::init_db;
use crate::error::Result;
use crate::types::{BatchStatus, MessageBatch, ScheduledMeta};

/// Handle over the two persistence tables.
///
/// Thread-safe: the connection sits behind a Mutex and every operation is a
/// single statement, so no lock is ever held across an await point.
pub struct MessageStore {
    conn: Mutex<Connection>,
}

impl MessageStore {
    /// Wrap `conn`, initialising the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Append one batch row. The log is append-only; there is no update
    /// or delete counterpart.
    pub fn insert_batch(
        &self,
        content: &str,
        recipient_count: u32,
        status: BatchStatus,
        error_message: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO messages (content, recipient_count, status, error_message)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![content, recipient_count, status.to_string(), error_message],
        )?;
        let id = conn.last_insert_rowid();
        debug!(batch_id = id, recipient_count, %status, "batch logged");
        Ok(id)
    }

    /// All batches, most recent first. `id DESC` breaks ties between rows
    /// created within the same `CURRENT_TIMESTAMP` second.
    pub fn list_batches(&self) -> Result<Vec<MessageBatch>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, content, send_time, status, recipient_count, error_message
             FROM messages ORDER BY send_time DESC, id DESC",
        )?;
        let batches = stmt
            .query_map([], |row| {
                Ok(MessageBatch {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    send_time: row.get(2)?,
                    // Unknown labels from older rows degrade to Pending
                    // rather than failing the whole listing.
                    status: row
                        .get::<_, String>(3)?
                        .parse()
                        .unwrap_or(BatchStatus::Pending),
                    recipient_count: row.get(4)?,
                    error_message: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(batches)
    }

    /// Insert or replace the metadata row for `sid`. Idempotent per SID:
    /// re-recording the same SID replaces rather than duplicates.
    pub fn upsert_scheduled_meta(&self, sid: &str, send_at_iso: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO scheduled_meta (sid, send_at_iso) VALUES (?1, ?2)",
            rusqlite::params![sid, send_at_iso],
        )?;
        debug!(%sid, send_at = send_at_iso, "scheduled metadata recorded");
        Ok(())
    }

    /// Every metadata row in one read. The table stays small (one row per
    /// scheduled send), so callers build their own lookup by SID.
    pub fn list_scheduled_meta(&self) -> Result<Vec<ScheduledMeta>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT sid, send_at_iso, created_at FROM scheduled_meta")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ScheduledMeta {
                    sid: row.get(0)?,
                    send_at_iso: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Metadata for one SID, if this engine created it.
    pub fn get_scheduled_meta(&self, sid: &str) -> Result<Option<ScheduledMeta>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT sid, send_at_iso, created_at FROM scheduled_meta WHERE sid = ?1",
                [sid],
                |row| {
                    Ok(ScheduledMeta {
                        sid: row.get(0)?,
                        send_at_iso: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> MessageStore {
        MessageStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn insert_and_list_batches() {
        let store = memory_store();
        let first = store
            .insert_batch("hello", 3, BatchStatus::Sent, None)
            .unwrap();
        let second = store
            .insert_batch("world", 2, BatchStatus::Partial, Some("failed: 1"))
            .unwrap();
        assert!(second > first);

        let batches = store.list_batches().unwrap();
        assert_eq!(batches.len(), 2);
        // Most recent first; same-second inserts fall back to id ordering.
        assert_eq!(batches[0].id, second);
        assert_eq!(batches[0].content, "world");
        assert_eq!(batches[0].status, BatchStatus::Partial);
        assert_eq!(batches[0].error_message.as_deref(), Some("failed: 1"));
        assert_eq!(batches[1].status, BatchStatus::Sent);
        assert_eq!(batches[1].error_message, None);
        assert!(!batches[0].send_time.is_empty());
    }

    #[test]
    fn batch_status_round_trips_through_text() {
        let store = memory_store();
        for status in [
            BatchStatus::Pending,
            BatchStatus::Sent,
            BatchStatus::Partial,
            BatchStatus::Failed,
        ] {
            store.insert_batch("s", 1, status, None).unwrap();
        }
        let statuses: Vec<_> = store
            .list_batches()
            .unwrap()
            .into_iter()
            .map(|b| b.status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                BatchStatus::Failed,
                BatchStatus::Partial,
                BatchStatus::Sent,
                BatchStatus::Pending,
            ]
        );
    }

    #[test]
    fn scheduled_meta_upsert_is_idempotent() {
        let store = memory_store();
        store
            .upsert_scheduled_meta("SM1", "2031-01-01T10:00:00+00:00")
            .unwrap();
        store
            .upsert_scheduled_meta("SM1", "2031-01-01T11:30:00+00:00")
            .unwrap();

        let rows = store.list_scheduled_meta().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sid, "SM1");
        assert_eq!(rows[0].send_at_iso, "2031-01-01T11:30:00+00:00");
    }

    #[test]
    fn get_scheduled_meta_for_unknown_sid_is_none() {
        let store = memory_store();
        assert!(store.get_scheduled_meta("SMmissing").unwrap().is_none());

        store
            .upsert_scheduled_meta("SM2", "2031-06-01T09:00:00+00:00")
            .unwrap();
        let row = store.get_scheduled_meta("SM2").unwrap().unwrap();
        assert_eq!(row.send_at_iso, "2031-06-01T09:00:00+00:00");
        assert!(!row.created_at.is_empty());
    }

    #[test]
    fn init_db_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_db(&conn).unwrap();
        crate::db::init_db(&conn).unwrap();
    }
}
