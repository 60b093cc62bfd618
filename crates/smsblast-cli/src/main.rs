use std::sync::Arc;

use clap::{Parser, Subcommand};
use smsblast_core::{Config, Credentials, Error};
use smsblast_dispatch::Dispatcher;
use smsblast_provider::{SmsProvider, TwilioClient};
use smsblast_schedule::{ScheduleError, ScheduleManager};
use smsblast_store::MessageStore;
use tracing::{info, warn};

mod render;

#[derive(Parser)]
#[command(
    name = "smsblast",
    about = "Bulk SMS dispatch and scheduling over Twilio",
    version
)]
struct Cli {
    /// Config file path (default: ~/.smsblast/smsblast.toml).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a message to one or more recipients now.
    Send {
        /// Recipient phone number; repeat for multiple recipients.
        #[arg(long = "to", required = true)]
        to: Vec<String>,
        #[arg(long)]
        message: String,
        #[arg(long)]
        media_url: Option<String>,
    },
    /// Show the batch log, most recent first.
    History,
    /// Manage future-dated sends.
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },
    /// Print the resolved configuration (auth token redacted).
    Settings,
}

#[derive(Subcommand)]
enum ScheduleCommand {
    /// Schedule a message for a future instant.
    Add {
        #[arg(long = "to", required = true)]
        to: Vec<String>,
        #[arg(long)]
        message: String,
        /// RFC 3339 instant, e.g. 2031-05-01T10:00:00+00:00.
        #[arg(long)]
        send_at: String,
        #[arg(long)]
        media_url: Option<String>,
    },
    /// List messages the provider still has as scheduled.
    List {
        #[arg(long, default_value_t = 50)]
        page_size: u32,
    },
    /// Cancel one scheduled message by SID.
    Cancel {
        #[arg(long)]
        sid: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smsblast=info".into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error[{}]: {e}", e.code());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> smsblast_core::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    ensure_parent_dir(&config.database.path)?;
    let conn = smsblast_store::db::open(&config.database.path)
        .map_err(|e| Error::Store(e.to_string()))?;
    let store =
        Arc::new(MessageStore::new(conn).map_err(|e| Error::Store(e.to_string()))?);
    info!(path = %config.database.path, "database ready");

    let settings = config.twilio.provider_settings();
    // With credentials missing the client is built with empty strings; the
    // dispatch/schedule components refuse network calls before it is used.
    let credentials = settings.credentials.clone().unwrap_or(Credentials {
        account_sid: String::new(),
        auth_token: String::new(),
    });
    let provider: Arc<dyn SmsProvider> = Arc::new(TwilioClient::new(&credentials, None));

    match cli.command {
        Command::Send {
            to,
            message,
            media_url,
        } => {
            let dispatcher = Dispatcher::new(provider, store, settings);
            let report = dispatcher
                .send_batch(&to, &message, media_url.as_deref())
                .await;
            render::batch_report(&report);

            // Persistence failure must not swallow the send outcome; the
            // remote side effects already happened.
            match dispatcher.record_batch(
                &message,
                report.results.len() as u32,
                report.derived_status(),
                report.error_summary().as_deref(),
            ) {
                Ok(id) => info!(batch_id = id, "batch logged"),
                Err(e) => warn!(error = %e, "batch not logged; send results above still stand"),
            }
        }
        Command::History => {
            let dispatcher = Dispatcher::new(provider, store, settings);
            let batches = dispatcher
                .list_batches()
                .map_err(|e| Error::Store(e.to_string()))?;
            render::history(&batches);
        }
        Command::Schedule { command } => {
            let manager = ScheduleManager::new(provider, store, settings);
            match command {
                ScheduleCommand::Add {
                    to,
                    message,
                    send_at,
                    media_url,
                } => {
                    let report = manager
                        .create(&to, &message, media_url.as_deref(), &send_at)
                        .await
                        .map_err(schedule_error)?;
                    render::schedule_report(&report);
                }
                ScheduleCommand::List { page_size } => {
                    let views = manager.list(page_size).await.map_err(schedule_error)?;
                    render::scheduled_views(&views);
                }
                ScheduleCommand::Cancel { sid } => {
                    manager.cancel(&sid).await.map_err(schedule_error)?;
                    println!("Canceled {sid}.");
                }
            }
        }
        Command::Settings => {
            render::settings(&config);
        }
    }

    Ok(())
}

/// Fold schedule errors into the top-level taxonomy: configuration
/// preconditions, provider failures and store failures keep their own
/// codes; the rest stay schedule-scoped.
fn schedule_error(e: ScheduleError) -> Error {
    match e {
        ScheduleError::MissingSettings | ScheduleError::NotMessagingService => {
            Error::Config(e.to_string())
        }
        ScheduleError::Provider(inner) => Error::Provider(inner.to_string()),
        ScheduleError::Store(inner) => Error::Store(inner.to_string()),
        other => Error::Schedule(other.to_string()),
    }
}

fn ensure_parent_dir(path: &str) -> std::io::Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
