//! `smsblast-core` — shared types, configuration and the top-level error enum.
//!
//! Everything here is provider-agnostic: credentials, the sender-identity
//! classification, and the figment-based config loader the CLI feeds into
//! the dispatch and schedule components.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::{Credentials, ProviderSettings, SenderIdentity};
