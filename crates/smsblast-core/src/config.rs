use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::types::{Credentials, ProviderSettings, SenderIdentity};

/// Top-level config (smsblast.toml + SMSBLAST_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Provider account settings. Any empty field means "not configured";
/// the core then refuses network calls instead of erroring at load time.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: String,
    #[serde(default)]
    pub auth_token: String,
    /// Sender: either an E.164 phone number or a messaging-service SID.
    #[serde(default)]
    pub from: String,
}

impl TwilioConfig {
    pub fn credentials(&self) -> Option<Credentials> {
        let sid = self.account_sid.trim();
        let token = self.auth_token.trim();
        if sid.is_empty() || token.is_empty() {
            return None;
        }
        Some(Credentials {
            account_sid: sid.to_string(),
            auth_token: token.to_string(),
        })
    }

    pub fn sender(&self) -> Option<SenderIdentity> {
        SenderIdentity::resolve(&self.from)
    }

    /// Resolved settings bundle for the dispatch/schedule components.
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            credentials: self.credentials(),
            sender: self.sender(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Config {
    /// Load config: explicit path > default `~/.smsblast/smsblast.toml`,
    /// then env overrides on top. Env keys use a double underscore between
    /// sections, e.g. `SMSBLAST_TWILIO__ACCOUNT_SID`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: Config = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("SMSBLAST_").split("__"))
            .extract()
            .map_err(|e| crate::error::Error::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.smsblast/smsblast.toml", home)
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.smsblast/smsblast.db", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credentials_are_none() {
        let cfg = TwilioConfig {
            account_sid: "AC123".into(),
            auth_token: "  ".into(),
            from: "+15550001111".into(),
        };
        assert!(cfg.credentials().is_none());
        // Sender still resolves on its own.
        assert!(cfg.sender().is_some());
        assert!(cfg.provider_settings().resolved().is_none());
    }

    #[test]
    fn full_config_resolves() {
        let cfg = TwilioConfig {
            account_sid: "AC123".into(),
            auth_token: "token".into(),
            from: "MGabc".into(),
        };
        let settings = cfg.provider_settings();
        let (creds, sender) = settings.resolved().unwrap();
        assert_eq!(creds.account_sid, "AC123");
        assert_eq!(sender.service_sid(), Some("MGabc"));
    }

    #[test]
    fn default_config_has_empty_twilio_section() {
        let cfg = Config::default();
        assert!(cfg.twilio.credentials().is_none());
        assert!(cfg.database.path.ends_with("smsblast.db"));
    }
}
