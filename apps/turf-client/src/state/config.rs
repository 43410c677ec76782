//! # Configuration State
//!
//! Client configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment variables (highest)                                    │
//! │     TURF_SESSION_TTL_HOURS=24                                          │
//! │     TURF_LOGIN_LATENCY_MS=1000                                         │
//! │     TURF_PAYMENT_LATENCY_MS=2000                                       │
//! │     TURF_TRANSACTION_PREFIX=TXN                                        │
//! │     TURF_STORAGE_PATH=/tmp/turf/session.json                           │
//! │                                                                         │
//! │  2. TOML file                                                          │
//! │     ~/.config/turf-client/turf.toml (Linux)                            │
//! │     ~/Library/Application Support/com.turf.client/turf.toml (macOS)    │
//! │                                                                         │
//! │  3. Defaults (lowest)                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## File Format
//! ```toml
//! session_ttl_hours = 24
//! login_latency_ms = 1000
//! payment_latency_ms = 2000
//! transaction_prefix = "TXN"
//! currency_symbol = "৳"
//! storage_path = "/var/lib/turf/session.json"
//! ```
//!
//! Read-only after startup.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use turf_core::{Money, GATEWAY_TRANSACTION_PREFIX, SESSION_TTL_HOURS};
use turf_store::SessionConfig;

/// Longest accepted session lifetime, one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Absolute session lifetime from login.
    pub session_ttl_hours: i64,

    /// Simulated latency of `login`.
    pub login_latency_ms: u64,

    /// Simulated latency of payment processing.
    pub payment_latency_ms: u64,

    /// Prefix of synthesized gateway transaction references.
    pub transaction_prefix: String,

    /// Currency symbol for display.
    pub currency_symbol: String,

    /// Session file location. `None` uses the platform data dir.
    pub storage_path: Option<PathBuf>,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            session_ttl_hours: SESSION_TTL_HOURS,
            login_latency_ms: 1000,
            payment_latency_ms: 2000,
            transaction_prefix: GATEWAY_TRANSACTION_PREFIX.to_string(),
            currency_symbol: "৳".to_string(),
            storage_path: None,
        }
    }
}

impl ConfigState {
    /// Loads configuration from file (if present) and environment.
    ///
    /// `config_path` overrides the platform default location. A missing
    /// file is not an error; a malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path.or_else(Self::default_config_path);

        let mut config = match path {
            Some(ref path) if path.exists() => {
                info!(path = %path.display(), "Loading config file");
                Self::from_toml_str(&std::fs::read_to_string(path)?)?
            }
            _ => {
                debug!("No config file, using defaults");
                ConfigState::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `TURF_*` overrides from `lookup`. Unparseable numbers are
    /// logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse_into<T: std::str::FromStr>(key: &str, raw: Option<String>, slot: &mut T) {
            if let Some(raw) = raw {
                match raw.trim().parse() {
                    Ok(value) => *slot = value,
                    Err(_) => warn!(%key, value = %raw, "Ignoring unparseable override"),
                }
            }
        }

        parse_into(
            "TURF_SESSION_TTL_HOURS",
            lookup("TURF_SESSION_TTL_HOURS"),
            &mut self.session_ttl_hours,
        );
        parse_into(
            "TURF_LOGIN_LATENCY_MS",
            lookup("TURF_LOGIN_LATENCY_MS"),
            &mut self.login_latency_ms,
        );
        parse_into(
            "TURF_PAYMENT_LATENCY_MS",
            lookup("TURF_PAYMENT_LATENCY_MS"),
            &mut self.payment_latency_ms,
        );

        if let Some(prefix) = lookup("TURF_TRANSACTION_PREFIX") {
            self.transaction_prefix = prefix;
        }
        if let Some(path) = lookup("TURF_STORAGE_PATH") {
            self.storage_path = Some(PathBuf::from(path));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
            return Err(ConfigError::Invalid(format!(
                "session_ttl_hours must be between 1 and {MAX_SESSION_TTL_HOURS}"
            )));
        }
        if self.transaction_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "transaction_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            ttl: chrono::Duration::try_hours(self.session_ttl_hours)
                .unwrap_or_else(|| chrono::Duration::hours(SESSION_TTL_HOURS)),
            login_latency: Duration::from_millis(self.login_latency_ms),
        }
    }

    pub fn payment_latency(&self) -> Duration {
        Duration::from_millis(self.payment_latency_ms)
    }

    /// Where the session file lives: the configured path, or
    /// `<data dir>/session.json`.
    pub fn session_file(&self) -> Option<PathBuf> {
        self.storage_path.clone().or_else(|| {
            directories::ProjectDirs::from("com", "turf", "client")
                .map(|dirs| dirs.data_dir().join("session.json"))
        })
    }

    pub fn format_amount(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "turf", "client")
            .map(|dirs| dirs.config_dir().join("turf.toml"))
    }
}
