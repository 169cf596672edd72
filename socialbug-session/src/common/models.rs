use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Third-party network an account can be linked from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Provider {
    Instagram,
    LinkedIn,
    Twitter,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Instagram, Provider::LinkedIn, Provider::Twitter];

    /// Wire identifier, as used in paths and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Instagram => "INSTAGRAM",
            Provider::LinkedIn => "LINKEDIN",
            Provider::Twitter => "TWITTER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provider::Instagram => "Instagram",
            Provider::LinkedIn => "LinkedIn",
            Provider::Twitter => "Twitter",
        }
    }
}

impl Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|provider| provider.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProviderParseError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderParseError(String);

impl std::fmt::Display for ProviderParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown provider '{}': expected INSTAGRAM, LINKEDIN or TWITTER",
            self.0
        )
    }
}

impl std::error::Error for ProviderParseError {}

/// Opaque bearer token for the current user
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Marker for an authorization started before leaving for the provider's consent page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuthorization {
    pub provider: Provider,
    pub started_at: DateTime<Utc>,
}

impl PendingAuthorization {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("instagram".parse::<Provider>(), Ok(Provider::Instagram));
        assert_eq!(" LINKEDIN ".parse::<Provider>(), Ok(Provider::LinkedIn));
        assert!("myspace".parse::<Provider>().is_err());
    }

    #[test]
    fn provider_serializes_as_wire_identifier() {
        let json = serde_json::to_string(&Provider::LinkedIn).unwrap();
        assert_eq!(json, "\"LINKEDIN\"");
        let back: Provider = serde_json::from_str("\"TWITTER\"").unwrap();
        assert_eq!(back, Provider::Twitter);
    }

    #[test]
    fn credential_debug_hides_token() {
        let credential = Credential::new("secret-token");
        assert_eq!(format!("{:?}", credential), "Credential(***)");
        assert_eq!(credential.expose(), "secret-token");
    }
}
