//! Configuration loading and representation.
//!
//! Everything comes from environment variables; unset variables fall back to
//! development defaults.

use std::net::SocketAddr;
use std::str::FromStr;

use stockroom_core::Locale;
use stockroom_inventory::{Localizer, WasteThresholds};
use stockroom_observability::LogFormat;
use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_JWT_SECRET: &str = "dev-secret";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CURRENCY: &str = "R$";
pub const DEFAULT_POLL_SECONDS: u64 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: `{value}` ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    /// `None` runs against the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    /// True when `JWT_SECRET` was unset and the development secret is in use.
    pub jwt_secret_is_default: bool,
    pub locale: Locale,
    pub currency: String,
    /// Used for users who never saved their own thresholds.
    pub waste_thresholds: WasteThresholds,
    /// Poll interval advertised to notification clients.
    pub notification_poll_seconds: u64,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_secret_is_default: true,
            locale: Locale::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            waste_thresholds: WasteThresholds::default(),
            notification_poll_seconds: DEFAULT_POLL_SECONDS,
            log_format: LogFormat::default(),
        }
    }
}

fn parsed<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid(key, &value, e)),
        _ => Ok(default),
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind = parsed("STOCKROOM_BIND", lookup("STOCKROOM_BIND"), defaults.bind)?;
        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let database_max_connections = parsed(
            "DATABASE_MAX_CONNECTIONS",
            lookup("DATABASE_MAX_CONNECTIONS"),
            defaults.database_max_connections,
        )?;
        if database_max_connections == 0 {
            return Err(ConfigError::invalid(
                "DATABASE_MAX_CONNECTIONS",
                "0",
                "must be at least 1",
            ));
        }

        let (jwt_secret, jwt_secret_is_default) =
            match lookup("JWT_SECRET").filter(|v| !v.is_empty()) {
                Some(secret) => (secret, false),
                None => (DEFAULT_JWT_SECRET.to_string(), true),
            };

        let locale = parsed("STOCKROOM_LOCALE", lookup("STOCKROOM_LOCALE"), defaults.locale)?;
        let currency = lookup("STOCKROOM_CURRENCY")
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or(defaults.currency);

        let safe = parsed(
            "WASTE_SAFE_THRESHOLD",
            lookup("WASTE_SAFE_THRESHOLD"),
            defaults.waste_thresholds.safe,
        )?;
        let critical = parsed(
            "WASTE_CRITICAL_THRESHOLD",
            lookup("WASTE_CRITICAL_THRESHOLD"),
            defaults.waste_thresholds.critical,
        )?;
        let waste_thresholds = WasteThresholds {
            safe: stockroom_core::two_places(safe),
            critical: stockroom_core::two_places(critical),
        };
        if waste_thresholds.validate().is_err() {
            return Err(ConfigError::invalid(
                "WASTE_SAFE_THRESHOLD",
                &format!("{safe}/{critical}"),
                "thresholds must be >= 0 with safe below critical",
            ));
        }

        let notification_poll_seconds = parsed(
            "NOTIFICATION_POLL_SECONDS",
            lookup("NOTIFICATION_POLL_SECONDS"),
            defaults.notification_poll_seconds,
        )?;
        let log_format = parsed("LOG_FORMAT", lookup("LOG_FORMAT"), defaults.log_format)?;

        Ok(Self {
            bind,
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_secret_is_default,
            locale,
            currency,
            waste_thresholds,
            notification_poll_seconds,
            log_format,
        })
    }

    pub fn localizer(&self) -> Localizer {
        Localizer::new(self.locale, self.currency.clone())
    }
}
