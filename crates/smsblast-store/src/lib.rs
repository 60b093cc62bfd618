//! `smsblast-store` — SQLite persistence for the dispatch engine.
//!
//! Two tables, no logic beyond CRUD with ordering guarantees:
//!
//! | Table            | Purpose                                            |
//! |------------------|----------------------------------------------------|
//! | `messages`       | Append-only log, one row per send-now batch        |
//! | `scheduled_meta` | Intended send time per provider-issued message SID |
//!
//! The batch log is never updated or deleted; `scheduled_meta` rows are
//! upserted by SID and survive cancellation (the provider forgets the
//! original send time, so the local row is the only audit record).

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::MessageStore;
pub use types::{BatchStatus, MessageBatch, ScheduledMeta};
