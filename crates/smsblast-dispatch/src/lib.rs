//! `smsblast-dispatch` — the send-now path.
//!
//! Fans one message out to N recipients sequentially, aggregates the
//! per-recipient outcomes, and (as a separate, explicit step) appends the
//! batch to the durable log.

pub mod dispatcher;
pub mod error;

pub use dispatcher::{BatchReport, Dispatcher, MISSING_SETTINGS};
pub use error::{DispatchError, Result};
