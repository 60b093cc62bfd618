//! Plain-text rendering of core results for the terminal.

use smsblast_core::{Config, SenderIdentity};
use smsblast_dispatch::BatchReport;
use smsblast_schedule::{ScheduleReport, ScheduledView};
use smsblast_store::MessageBatch;

pub fn batch_report(report: &BatchReport) {
    for (to, status) in &report.results {
        println!("{to}: {status}");
    }
    println!("ok={} fail={}", report.ok, report.fail);
}

pub fn history(batches: &[MessageBatch]) {
    if batches.is_empty() {
        println!("No batches logged yet.");
        return;
    }
    for b in batches {
        let error = b
            .error_message
            .as_deref()
            .map(|e| format!(" ({e})"))
            .unwrap_or_default();
        println!(
            "#{} [{}] {} recipients={}{} | {}",
            b.id, b.send_time, b.status, b.recipient_count, error, b.content
        );
    }
}

pub fn schedule_report(report: &ScheduleReport) {
    for r in &report.results {
        match (&r.sid, &r.error) {
            (Some(sid), None) => println!("{}: scheduled as {sid}", r.to),
            (Some(sid), Some(e)) => println!("{}: scheduled as {sid} (warning: {e})", r.to),
            (None, Some(e)) => println!("{}: failed: {e}", r.to),
            (None, None) => println!("{}: no outcome", r.to),
        }
    }
    println!("{}", if report.ok { "All scheduled." } else { "Some recipients failed." });
}

pub fn scheduled_views(views: &[ScheduledView]) {
    if views.is_empty() {
        println!("Nothing scheduled.");
        return;
    }
    for v in views {
        let send_at = v.send_at_iso.as_deref().unwrap_or("-");
        let created = v.date_created.as_deref().unwrap_or("-");
        println!(
            "{} to={} status={} send_at={} created={} media={}\n    {}",
            v.sid, v.to, v.status, send_at, created, v.num_media, v.body_preview
        );
    }
}

pub fn settings(config: &Config) {
    let sender = match config.twilio.sender() {
        Some(SenderIdentity::Service(sid)) => format!("messaging service {sid}"),
        Some(SenderIdentity::Direct(number)) => format!("direct number {number}"),
        None => "(not configured)".to_string(),
    };
    println!("account_sid: {}", blank_or(&config.twilio.account_sid));
    println!("auth_token:  {}", redact(&config.twilio.auth_token));
    println!("sender:      {sender}");
    println!("database:    {}", config.database.path);
}

fn blank_or(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not configured)"
    } else {
        value
    }
}

/// Keep only the last four characters of a secret.
fn redact(token: &str) -> String {
    let token = token.trim();
    if token.is_empty() {
        return "(not configured)".to_string();
    }
    let tail: String = token
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_keeps_only_the_tail() {
        assert_eq!(redact("super-secret-token"), "…oken");
        assert_eq!(redact("abc"), "…abc");
        assert_eq!(redact("  "), "(not configured)");
    }
}
