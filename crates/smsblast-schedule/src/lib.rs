//! `smsblast-schedule` — future-dated sends and their reconciliation.
//!
//! The provider owns the lifecycle of a scheduled message
//! (`scheduled → sent | canceled | failed`) but does not retain the
//! caller's intended send instant. This crate creates scheduled sends,
//! records that intent locally, and merges the two views on listing.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{Result, ScheduleError};
pub use manager::ScheduleManager;
pub use types::{ScheduleOutcome, ScheduleReport, ScheduledView};
