//! Twilio REST client (2010-04-01 API).
//!
//! All message operations live under
//! `/2010-04-01/Accounts/{AccountSid}/Messages`, authenticated with HTTP
//! Basic auth (account SID / auth token) and form-encoded bodies.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use smsblast_core::{Credentials, SenderIdentity};
use tracing::{debug, warn};

use crate::error::{ProviderError, Result};
use crate::types::{RemoteMessage, ScheduleRequest, SendRequest, SentMessage};
use crate::SmsProvider;

const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

pub struct TwilioClient {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    base_url: String,
}

impl TwilioClient {
    pub fn new(credentials: &Credentials, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            account_sid: credentials.account_sid.clone(),
            auth_token: credentials.auth_token.clone(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }

    fn message_url(&self, sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages/{}.json",
            self.base_url, self.account_sid, sid
        )
    }

    /// Turn a non-2xx response into [`ProviderError::Api`], then decode the
    /// success body as `T`.
    async fn read_json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "Twilio API error");
            return Err(decode_error_body(status, &text));
        }
        resp.json::<T>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl SmsProvider for TwilioClient {
    async fn send(&self, req: &SendRequest) -> Result<SentMessage> {
        let mut form: Vec<(&str, &str)> = vec![("To", &req.to), ("Body", &req.body)];
        match &req.sender {
            SenderIdentity::Direct(number) => form.push(("From", number)),
            SenderIdentity::Service(sid) => form.push(("MessagingServiceSid", sid)),
        }
        if let Some(url) = &req.media_url {
            form.push(("MediaUrl", url));
        }

        debug!(to = %req.to, "sending message");
        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        let msg: ApiMessage = Self::read_json(resp).await?;
        Ok(SentMessage {
            sid: msg.sid,
            status: msg.status,
        })
    }

    async fn schedule_send(&self, req: &ScheduleRequest) -> Result<SentMessage> {
        let send_at = format_send_at(req.send_at);
        let mut form: Vec<(&str, &str)> = vec![
            ("To", &req.to),
            ("Body", &req.body),
            ("MessagingServiceSid", &req.service_sid),
            ("ScheduleType", "fixed"),
            ("SendAt", &send_at),
        ];
        if let Some(url) = &req.media_url {
            form.push(("MediaUrl", url));
        }

        debug!(to = %req.to, %send_at, "scheduling message");
        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        let msg: ApiMessage = Self::read_json(resp).await?;
        Ok(SentMessage {
            sid: msg.sid,
            status: msg.status,
        })
    }

    async fn list_scheduled(&self, status: &str, page_size: u32) -> Result<Vec<RemoteMessage>> {
        debug!(status, page_size, "listing remote messages");
        let page_size = page_size.to_string();
        let resp = self
            .client
            .get(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .query(&[("Status", status), ("PageSize", page_size.as_str())])
            .send()
            .await?;

        let list: ApiMessageList = Self::read_json(resp).await?;
        Ok(list.messages.into_iter().map(RemoteMessage::from).collect())
    }

    async fn update_status(&self, sid: &str, new_status: &str) -> Result<String> {
        debug!(%sid, new_status, "requesting status update");
        let resp = self
            .client
            .post(self.message_url(sid))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("Status", new_status)])
            .send()
            .await?;

        let msg: ApiMessage = Self::read_json(resp).await?;
        Ok(msg.status)
    }
}

/// Twilio wants `SendAt` as an RFC 3339 UTC instant with a `Z` suffix and
/// no sub-second precision.
fn format_send_at(send_at: DateTime<Utc>) -> String {
    send_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Best-effort decode of Twilio's error JSON (`{code, message, status}`);
/// falls back to the raw body, then to a bare HTTP status.
fn decode_error_body(status: u16, body: &str) -> ProviderError {
    #[derive(Deserialize)]
    struct ApiError {
        message: Option<String>,
    }

    let message = serde_json::from_str::<ApiError>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {status}")
            } else {
                trimmed.to_string()
            }
        });
    ProviderError::Api { status, message }
}

/// Message resource as Twilio returns it. `num_media` arrives as a string.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    sid: String,
    status: String,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    messaging_service_sid: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    num_media: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMessageList {
    #[serde(default)]
    messages: Vec<ApiMessage>,
}

impl From<ApiMessage> for RemoteMessage {
    fn from(msg: ApiMessage) -> Self {
        RemoteMessage {
            sid: msg.sid,
            to: msg.to.unwrap_or_default(),
            status: msg.status,
            date_created: msg.date_created,
            messaging_service_sid: msg.messaging_service_sid,
            body: msg.body.unwrap_or_default(),
            num_media: msg
                .num_media
                .as_deref()
                .and_then(|n| n.parse().ok())
                .unwrap_or(0),
        }
    }
}
