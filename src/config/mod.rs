//! Layered runtime settings
//!
//! Precedence, lowest first: built-in defaults, the TOML config file,
//! `TFC_TRIGGER_*` environment variables, then command line flags.

use crate::error::{ErrorCode, Result, TfcError};
use crate::logging::LogFormat;
use crate::tfcloud::client::{ClientConfig, TF_CLOUD_BASE};
use crate::tfcloud::gate::DEFAULT_MAX_IN_FLIGHT;
use crate::tfcloud::models::AUTO_TRIGGER_MESSAGE;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub mod credentials;
pub mod loader;

pub use credentials::{resolve_token, resolve_token_with, TokenSource};
pub use loader::{default_config_path, load_settings, load_settings_with};

pub const ENV_BASE_URL: &str = "TFC_TRIGGER_BASE_URL";
pub const ENV_MAX_IN_FLIGHT: &str = "TFC_TRIGGER_MAX_IN_FLIGHT";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "TFC_TRIGGER_REQUEST_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "TFC_TRIGGER_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Terraform Cloud or Terraform Enterprise address
    pub base_url: String,
    /// Run creation calls allowed in flight at once
    pub max_in_flight: usize,
    /// Per-request timeout; none by default
    pub request_timeout_secs: Option<u64>,
    /// Message attached to created runs
    pub message: String,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: TF_CLOUD_BASE.to_string(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            request_timeout_secs: None,
            message: AUTO_TRIGGER_MESSAGE.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Settings {
    /// Apply `TFC_TRIGGER_*` variables read through `lookup`
    pub fn merge_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = var(ENV_BASE_URL) {
            self.base_url = base_url.trim().to_string();
        }

        if let Some(value) = var(ENV_MAX_IN_FLIGHT) {
            self.max_in_flight = value.trim().parse::<usize>().map_err(|e| {
                invalid_value(ENV_MAX_IN_FLIGHT, format!("'{value}' is not a number")).with_source(e)
            })?;
        }

        if let Some(value) = var(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = value.trim().parse::<u64>().map_err(|e| {
                invalid_value(ENV_REQUEST_TIMEOUT_SECS, format!("'{value}' is not a number"))
                    .with_source(e)
            })?;
            self.request_timeout_secs = Some(secs);
        }

        if let Some(value) = var(ENV_LOG_FORMAT) {
            self.log_format = value
                .parse::<LogFormat>()
                .map_err(|e: String| invalid_value(ENV_LOG_FORMAT, e))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_in_flight == 0 {
            return Err(invalid_value(
                "max_in_flight",
                "must allow at least one call in flight",
            ));
        }

        let url = Url::parse(&self.base_url).map_err(|e| {
            invalid_value("base_url", format!("'{}' is not a URL", self.base_url)).with_source(e)
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid_value(
                "base_url",
                format!("'{}' must be an absolute http(s) URL", self.base_url),
            ));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(invalid_value("request_timeout_secs", "must be positive"));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// HTTP client settings for the given token
    pub fn client_config(&self, token: Option<String>) -> ClientConfig {
        ClientConfig::new(self.base_url.clone())
            .with_token(token)
            .with_timeout(self.request_timeout())
    }
}

fn invalid_value(field: &str, message: impl Into<String>) -> TfcError {
    TfcError::config_with_code(
        ErrorCode::CONFIG_INVALID_VALUE,
        message,
        Some(field.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, "https://app.terraform.io");
        assert_eq!(settings.max_in_flight, 3);
        assert_eq!(settings.request_timeout(), None);
        assert_eq!(settings.message, "Auto-trigger");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_merge_env_overrides() {
        let mut settings = Settings::default();
        settings
            .merge_env_with(env(&[
                (ENV_BASE_URL, "https://tfe.example.com"),
                (ENV_MAX_IN_FLIGHT, "8"),
                (ENV_REQUEST_TIMEOUT_SECS, "30"),
                (ENV_LOG_FORMAT, "json"),
            ]))
            .unwrap();

        assert_eq!(settings.base_url, "https://tfe.example.com");
        assert_eq!(settings.max_in_flight, 8);
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut settings = Settings::default();
        settings
            .merge_env_with(env(&[(ENV_BASE_URL, ""), (ENV_MAX_IN_FLIGHT, "  ")]))
            .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_bad_env_value_names_the_variable() {
        let mut settings = Settings::default();
        let err = settings
            .merge_env_with(env(&[(ENV_MAX_IN_FLIGHT, "many")]))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_VALUE);
        assert!(err.user_message().contains(ENV_MAX_IN_FLIGHT));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let settings = Settings {
            max_in_flight: 0,
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.user_message().contains("max_in_flight"));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        for base_url in ["app.terraform.io", "ftp://tfe.example.com", "mailto:ops@example.com"] {
            let settings = Settings {
                base_url: base_url.to_string(),
                ..Settings::default()
            };
            assert!(settings.validate().is_err(), "{base_url} should be rejected");
        }
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str("max_in_flight = 5\n").unwrap();
        assert_eq!(settings.max_in_flight, 5);
        assert_eq!(settings.base_url, TF_CLOUD_BASE);
    }

    #[test]
    fn test_unknown_toml_key_is_rejected() {
        assert!(toml::from_str::<Settings>("max_inflight = 5\n").is_err());
    }

    #[test]
    fn test_client_config_carries_timeout() {
        let settings = Settings {
            request_timeout_secs: Some(10),
            ..Settings::default()
        };
        let config = settings.client_config(Some("t".to_string()));
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.token.as_deref(), Some("t"));
        assert_eq!(config.base_url, TF_CLOUD_BASE);
    }
}
