/// Messaging-service SIDs start with this prefix; anything else configured
/// as the sender is treated as a direct phone number.
const MESSAGING_SERVICE_PREFIX: &str = "MG";

/// Account credentials for the messaging provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_sid: String,
    pub auth_token: String,
}

/// How outbound messages identify their sender.
///
/// Resolved once at configuration load instead of re-checking the raw
/// string on every send. Scheduling is only available through `Service`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SenderIdentity {
    /// A direct source address (an E.164 phone number).
    Direct(String),
    /// A messaging-service SID (`MG...`) — enables scheduled sends.
    Service(String),
}

impl SenderIdentity {
    /// Classify a configured sender string. Empty (after trimming) means
    /// "not configured" and yields `None`.
    pub fn resolve(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else if raw.starts_with(MESSAGING_SERVICE_PREFIX) {
            Some(SenderIdentity::Service(raw.to_string()))
        } else {
            Some(SenderIdentity::Direct(raw.to_string()))
        }
    }

    /// The messaging-service SID, if this identity is service-backed.
    pub fn service_sid(&self) -> Option<&str> {
        match self {
            SenderIdentity::Service(sid) => Some(sid),
            SenderIdentity::Direct(_) => None,
        }
    }
}

/// Everything the dispatch and schedule components need from settings,
/// resolved up front so tests can inject fixtures without a config file.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub credentials: Option<Credentials>,
    pub sender: Option<SenderIdentity>,
}

impl ProviderSettings {
    /// Both credentials and a sender identity, or `None` if anything is
    /// missing. Components treat `None` as "do not touch the network".
    pub fn resolved(&self) -> Option<(&Credentials, &SenderIdentity)> {
        match (&self.credentials, &self.sender) {
            (Some(creds), Some(sender)) => Some((creds, sender)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sender_is_unconfigured() {
        assert_eq!(SenderIdentity::resolve(""), None);
        assert_eq!(SenderIdentity::resolve("   "), None);
    }

    #[test]
    fn service_prefix_is_detected() {
        let id = SenderIdentity::resolve("MG0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(
            id.service_sid(),
            Some("MG0123456789abcdef0123456789abcdef")
        );
    }

    #[test]
    fn phone_number_is_direct() {
        let id = SenderIdentity::resolve("+15558675309").unwrap();
        assert_eq!(id, SenderIdentity::Direct("+15558675309".to_string()));
        assert_eq!(id.service_sid(), None);
    }

    #[test]
    fn settings_resolve_requires_both_halves() {
        let creds = Credentials {
            account_sid: "AC123".into(),
            auth_token: "token".into(),
        };
        let full = ProviderSettings {
            credentials: Some(creds.clone()),
            sender: SenderIdentity::resolve("+15550001111"),
        };
        assert!(full.resolved().is_some());

        let no_sender = ProviderSettings {
            credentials: Some(creds),
            sender: None,
        };
        assert!(no_sender.resolved().is_none());
        assert!(ProviderSettings::default().resolved().is_none());
    }
}
