//! Settings and credentials for cf-empty-email.
//!
//! Settings come from built-in defaults, an optional TOML file in the
//! platform config directory and `CFMAIL_`-prefixed environment variables,
//! in that order of precedence. Cloudflare credentials are only ever read
//! from `CF_API_KEY` / `CF_API_EMAIL` and are validated before any request.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use regex::Regex;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use cfmail_api::{ApiCredentials, DEFAULT_API_BASE, TransportConfig};
use cfmail_core::{MxScope, ReplacementSet, TxtQuoting};

pub const API_KEY_VAR: &str = "CF_API_KEY";
pub const API_EMAIL_VAR: &str = "CF_API_EMAIL";

const KEY_PATTERN: &str = r"^[A-Za-z0-9_]*$";
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| compile_pattern(KEY_PATTERN, "KEY_RE"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| compile_pattern(EMAIL_PATTERN, "EMAIL_RE"));

/// Patterns are constants; a compile failure is a programming error.
fn compile_pattern(pattern: &str, name: &str) -> Regex {
    Regex::new(pattern)
        .unwrap_or_else(|e| panic!("invalid regex constant {name} ({pattern}): {e}"))
}

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CF_API_KEY and CF_API_EMAIL must be set to valid values: {reason}")]
    InvalidCredentials { reason: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Run-wide settings, before CLI flag overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Cloudflare v4 API root.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub mx_scope: MxScope,

    #[serde(default)]
    pub txt_quoting: TxtQuoting,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout: default_timeout(),
            mx_scope: MxScope::default(),
            txt_quoting: TxtQuoting::default(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.into()
}
fn default_timeout() -> u64 {
    30
}

impl Settings {
    /// Transport for the configured API root and timeout.
    pub fn transport(&self) -> Result<TransportConfig, ConfigError> {
        let base_url: Url = self.api_base.parse().map_err(|e| ConfigError::Validation {
            field: "api_base".into(),
            reason: format!("invalid URL '{}': {e}", self.api_base),
        })?;

        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        Ok(TransportConfig::new(base_url).with_timeout(Duration::from_secs(self.timeout)))
    }

    pub fn replacement(&self) -> ReplacementSet {
        ReplacementSet::new(self.mx_scope, self.txt_quoting)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "cf-empty-email", "cf-empty-email").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("cf-empty-email");
    p
}

// ── Settings loading ────────────────────────────────────────────────

/// Provider chain: defaults, then `path` if it exists, then `CFMAIL_*`.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CFMAIL_"))
}

/// Load settings from the canonical config path and environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&config_path())
}

pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let settings: Settings = figment(path).extract()?;
    Ok(settings)
}

// ── Credentials ─────────────────────────────────────────────────────

/// Read and validate `CF_API_KEY` / `CF_API_EMAIL` from the environment.
pub fn load_credentials() -> Result<ApiCredentials, ConfigError> {
    validate_credentials(
        std::env::var(API_KEY_VAR).ok(),
        std::env::var(API_EMAIL_VAR).ok(),
    )
}

/// Check a key/email pair; both must be present and well formed.
pub fn validate_credentials(
    key: Option<String>,
    email: Option<String>,
) -> Result<ApiCredentials, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidCredentials {
        reason: reason.into(),
    };

    let key = key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| invalid(&format!("{API_KEY_VAR} is missing")))?;
    let email = email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| invalid(&format!("{API_EMAIL_VAR} is missing")))?;

    if !KEY_RE.is_match(&key) {
        return Err(invalid(&format!(
            "{API_KEY_VAR} may only contain letters, digits and underscores"
        )));
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(invalid(&format!("{API_EMAIL_VAR} is not a valid email address")));
    }

    Ok(ApiCredentials {
        key: SecretString::from(key),
        email,
    })
}
