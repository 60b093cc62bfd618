use thiserror::Error;

/// Top-level error for the command surface.
///
/// Component crates keep their own error enums; the CLI folds them into
/// this one so every failure leaves the process with a stable error code.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Schedule error: {0}")]
    Schedule(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short machine-readable code printed alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::Store(_) => "STORE_ERROR",
            Error::Provider(_) => "PROVIDER_ERROR",
            Error::Schedule(_) => "SCHEDULE_ERROR",
            Error::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
