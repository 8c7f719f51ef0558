//! # Relay Configuration
//!
//! Where submissions go and how the menu is fetched.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SAFFRA_RELAY_ACCESS_KEY=...                                        │
//! │     SAFFRA_MENU_URL=https://db.example.com                             │
//! │                                                                         │
//! │  2. TOML Config File (path in SAFFRA_CONFIG)                           │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     web3forms endpoint, built-in subjects, default pricing             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! relay_url = "https://api.web3forms.com/submit"
//! access_key = "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
//! contact_subject = "New catering inquiry"
//! careers_subject = "New job application"
//! menu_url = "https://db.example.com"
//! menu_api_key = "public-anon-key"
//! delivery_fee_cents = 4900
//! free_delivery_threshold_cents = 50000
//! support_phone = "040-12 34 56"
//! support_email = "hello@saffra.se"
//! ```
//!
//! The access key is only checked when a submission is sent, so the menu
//! can be served without one.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use saffra_core::{Money, PricingPolicy};

pub const DEFAULT_RELAY_URL: &str = "https://api.web3forms.com/submit";
pub const DEFAULT_CONTACT_SUBJECT: &str = "New catering inquiry";
pub const DEFAULT_CAREERS_SUBJECT: &str = "New job application";

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "SAFFRA_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Email relay endpoint.
    pub relay_url: String,

    /// Relay access key. Required to submit.
    pub access_key: Option<String>,

    pub contact_subject: String,

    pub careers_subject: String,

    /// Base URL of the menu database REST API.
    pub menu_url: Option<String>,

    /// Public API key for the menu database.
    pub menu_api_key: Option<String>,

    /// Overrides `saffra_core::DELIVERY_FEE`.
    pub delivery_fee_cents: Option<i64>,

    /// Overrides `saffra_core::FREE_DELIVERY_THRESHOLD`.
    pub free_delivery_threshold_cents: Option<i64>,

    /// Phone number offered in the error message.
    pub support_phone: Option<String>,

    /// Address offered in the error message.
    pub support_email: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            access_key: None,
            contact_subject: DEFAULT_CONTACT_SUBJECT.to_string(),
            careers_subject: DEFAULT_CAREERS_SUBJECT.to_string(),
            menu_url: None,
            menu_api_key: None,
            delivery_fee_cents: None,
            free_delivery_threshold_cents: None,
            support_phone: None,
            support_email: None,
        }
    }
}

impl RelayConfig {
    /// Loads defaults, then the file in `SAFFRA_CONFIG` (if set), then
    /// `SAFFRA_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(
            relay_url = %config.relay_url,
            menu_configured = config.menu_url.is_some(),
            access_key_set = config.access_key.is_some(),
            "Relay configuration loaded"
        );
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading relay config file");

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `SAFFRA_*` overrides from a key lookup.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup("SAFFRA_RELAY_URL") {
            self.relay_url = v;
        }
        if let Some(v) = lookup("SAFFRA_RELAY_ACCESS_KEY") {
            self.access_key = Some(v);
        }
        if let Some(v) = lookup("SAFFRA_CONTACT_SUBJECT") {
            self.contact_subject = v;
        }
        if let Some(v) = lookup("SAFFRA_CAREERS_SUBJECT") {
            self.careers_subject = v;
        }
        if let Some(v) = lookup("SAFFRA_MENU_URL") {
            self.menu_url = Some(v);
        }
        if let Some(v) = lookup("SAFFRA_MENU_API_KEY") {
            self.menu_api_key = Some(v);
        }
        if let Some(v) = lookup("SAFFRA_DELIVERY_FEE_CENTS") {
            self.delivery_fee_cents = Some(parse_cents("SAFFRA_DELIVERY_FEE_CENTS", &v)?);
        }
        if let Some(v) = lookup("SAFFRA_FREE_DELIVERY_THRESHOLD_CENTS") {
            self.free_delivery_threshold_cents =
                Some(parse_cents("SAFFRA_FREE_DELIVERY_THRESHOLD_CENTS", &v)?);
        }
        if let Some(v) = lookup("SAFFRA_SUPPORT_PHONE") {
            self.support_phone = Some(v);
        }
        if let Some(v) = lookup("SAFFRA_SUPPORT_EMAIL") {
            self.support_email = Some(v);
        }
        Ok(())
    }

    /// Checks values that can be checked without a submission.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.relay_url.starts_with("http://") && !self.relay_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue("relay_url".to_string()));
        }
        if let Some(url) = &self.menu_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue("menu_url".to_string()));
            }
        }
        if self.delivery_fee_cents.is_some_and(|c| c < 0) {
            return Err(ConfigError::InvalidValue("delivery_fee_cents".to_string()));
        }
        if self.free_delivery_threshold_cents.is_some_and(|c| c < 0) {
            return Err(ConfigError::InvalidValue(
                "free_delivery_threshold_cents".to_string(),
            ));
        }
        Ok(())
    }

    /// The access key, trimmed. Blank counts as missing.
    pub fn require_access_key(&self) -> Result<&str, ConfigError> {
        self.access_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingRequired("access_key".to_string()))
    }

    /// Delivery pricing with any overrides applied.
    pub fn pricing(&self) -> PricingPolicy {
        let defaults = PricingPolicy::default();
        PricingPolicy {
            delivery_fee: self
                .delivery_fee_cents
                .map(Money::from_cents)
                .unwrap_or(defaults.delivery_fee),
            free_delivery_threshold: self
                .free_delivery_threshold_cents
                .map(Money::from_cents)
                .unwrap_or(defaults.free_delivery_threshold),
        }
    }
}

fn parse_cents(key: &str, value: &str) -> Result<i64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.relay_url, DEFAULT_RELAY_URL);
        assert_eq!(config.pricing(), PricingPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_file_keeps_defaults() {
        let config = RelayConfig::from_toml_str(
            r#"
            access_key = "abc-123"
            delivery_fee_cents = 5900
            "#,
        )
        .unwrap();

        assert_eq!(config.access_key.as_deref(), Some("abc-123"));
        assert_eq!(config.contact_subject, DEFAULT_CONTACT_SUBJECT);
        assert_eq!(config.pricing().delivery_fee, Money::from_major(59));
        assert_eq!(
            config.pricing().free_delivery_threshold,
            saffra_core::FREE_DELIVERY_THRESHOLD
        );
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = RelayConfig::from_toml_str(r#"access_key = "from-file""#).unwrap();
        let env: HashMap<&str, &str> = [
            ("SAFFRA_RELAY_ACCESS_KEY", "from-env"),
            ("SAFFRA_FREE_DELIVERY_THRESHOLD_CENTS", "80000"),
        ]
        .into_iter()
        .collect();

        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.access_key.as_deref(), Some("from-env"));
        assert_eq!(config.pricing().free_delivery_threshold, Money::from_major(800));
    }

    #[test]
    fn test_invalid_numeric_override() {
        let mut config = RelayConfig::default();
        let result = config.apply_overrides(|k| {
            (k == "SAFFRA_DELIVERY_FEE_CENTS").then(|| "forty-nine".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_validate_rejects_bad_urls_and_negative_pricing() {
        let mut config = RelayConfig {
            relay_url: "ftp://relay".to_string(),
            ..RelayConfig::default()
        };
        assert!(config.validate().is_err());

        config.relay_url = DEFAULT_RELAY_URL.to_string();
        config.delivery_fee_cents = Some(-1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_require_access_key() {
        let mut config = RelayConfig::default();
        assert!(matches!(
            config.require_access_key(),
            Err(ConfigError::MissingRequired(_))
        ));

        config.access_key = Some("   ".to_string());
        assert!(config.require_access_key().is_err());

        config.access_key = Some(" key ".to_string());
        assert_eq!(config.require_access_key().unwrap(), "key");
    }

    #[test]
    fn test_unparseable_file() {
        assert!(matches!(
            RelayConfig::from_toml_str("access_key = "),
            Err(ConfigError::Parse(_))
        ));
    }
}
