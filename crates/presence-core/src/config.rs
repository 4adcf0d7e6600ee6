//! Platform configuration: the hub hands us a loosely-typed mapping; we
//! resolve it field by field into a typed [`TrackerConfig`] with defaults,
//! failing before any controller interaction when credentials are missing
//! or a value won't coerce.

use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use presence_api::ControllerConfig;

/// How long the hub keeps reporting a device as home after it stops
/// appearing in scans, when the config doesn't say otherwise.
pub const DEFAULT_CONSIDER_HOME: Duration = Duration::from_secs(180);

/// The legacy API version this adapter speaks. Not configurable.
const API_VERSION: &str = "v5";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8443;
const DEFAULT_SITE_ID: &str = "default";

/// Configuration validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("malformed configuration: {0}")]
    Malformed(String),
}

// ── Raw (wire) form ──────────────────────────────────────────────────

/// Serde view of the inbound platform mapping.
///
/// `port` and `consider_home` stay loosely typed so coercion failures
/// surface as [`ConfigError`]s with a field name, not serde errors.
#[derive(Debug, Default, Deserialize)]
pub struct RawTrackerConfig {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<Value>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub verify_ssl: Option<bool>,
    #[serde(default)]
    pub consider_home: Option<Value>,
}

// ── Validated form ───────────────────────────────────────────────────

/// Validated tracker configuration with defaults applied.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub username: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub site_id: String,
    pub verify_ssl: bool,
    pub consider_home: Duration,
}

impl RawTrackerConfig {
    /// Resolve every field, applying defaults and coercions.
    pub fn validate(self) -> Result<TrackerConfig, ConfigError> {
        let username = self.username.ok_or(ConfigError::MissingField("username"))?;
        let password = self
            .password
            .map(SecretString::from)
            .ok_or(ConfigError::MissingField("password"))?;

        let port = match self.port {
            None => DEFAULT_PORT,
            Some(value) => coerce_port(&value)?,
        };

        let consider_home = match self.consider_home {
            None => DEFAULT_CONSIDER_HOME,
            Some(value) => coerce_duration(&value)?,
        };

        Ok(TrackerConfig {
            username,
            password,
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            site_id: self.site_id.unwrap_or_else(|| DEFAULT_SITE_ID.to_owned()),
            verify_ssl: self.verify_ssl.unwrap_or(true),
            consider_home,
        })
    }
}

impl TrackerConfig {
    /// Parse-then-validate the hub's mapping form.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let raw: RawTrackerConfig =
            serde_json::from_value(value).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        raw.validate()
    }

    /// The connection record handed to the controller client.
    ///
    /// This is the single boundary where tracker config crosses into
    /// `presence-api` types; the API version is pinned here.
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            host: self.host.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            port: self.port,
            version: API_VERSION.to_owned(),
            site_id: self.site_id.clone(),
            verify_ssl: self.verify_ssl,
        }
    }
}

// ── Coercions ────────────────────────────────────────────────────────

/// Accept a JSON integer or an integer-like string in 1..=65535.
fn coerce_port(value: &Value) -> Result<u16, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        field: "port",
        reason,
    };

    let port = match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .ok_or_else(|| invalid(format!("{n} is out of range")))?,
        Value::String(s) => s
            .parse::<u16>()
            .map_err(|_| invalid(format!("{s:?} is not an integer")))?,
        other => return Err(invalid(format!("expected integer, got {other}"))),
    };

    if port == 0 {
        return Err(invalid("0 is out of range".to_owned()));
    }
    Ok(port)
}

/// Accept integer seconds or a humantime string ("3m", "90s").
fn coerce_duration(value: &Value) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        field: "consider_home",
        reason,
    };

    match value {
        Value::Number(n) => n
            .as_u64()
            .map(Duration::from_secs)
            .ok_or_else(|| invalid(format!("{n} is not a whole number of seconds"))),
        Value::String(s) => {
            humantime::parse_duration(s).map_err(|e| invalid(format!("{s:?}: {e}")))
        }
        other => Err(invalid(format!("expected seconds or duration, got {other}"))),
    }
}

// ── Tests ────────────────────────────────────────────────────────────
