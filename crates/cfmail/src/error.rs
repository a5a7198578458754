//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use cfmail_config::ConfigError;
use cfmail_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Credentials ──────────────────────────────────────────────────

    #[error("Invalid Cloudflare credentials: {reason}")]
    #[diagnostic(
        code(cfmail::credentials),
        help(
            "Export both variables before running:\n\
             CF_API_KEY    global API key (letters, digits and underscores)\n\
             CF_API_EMAIL  email address of the Cloudflare account"
        )
    )]
    InvalidCredentials { reason: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(cfmail::auth_failed),
        help("Verify CF_API_KEY and CF_API_EMAIL belong to the same Cloudflare account.")
    )]
    AuthFailed { message: String },

    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the Cloudflare API")]
    #[diagnostic(
        code(cfmail::connection_failed),
        help("Check network connectivity and the configured API root.")
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to the Cloudflare API timed out")]
    #[diagnostic(
        code(cfmail::timeout),
        help("Increase the timeout with --timeout or CFMAIL_TIMEOUT.")
    )]
    Timeout {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Zones ────────────────────────────────────────────────────────

    #[error("Zone '{name}' not found")]
    #[diagnostic(
        code(cfmail::zone_not_found),
        help("Run cf-empty-email without a zone name to list available zones.")
    )]
    ZoneNotFound { name: String },

    #[error("Unable to retrieve zone information")]
    #[diagnostic(code(cfmail::zone_lookup))]
    ZoneLookup {
        #[source]
        source: CoreError,
    },

    // ── Records ──────────────────────────────────────────────────────

    #[error("Email DNS records already exist for {zone}")]
    #[diagnostic(
        code(cfmail::records_exist),
        help("Pass --force to delete them and add the empty email records.")
    )]
    RecordsExist { zone: String },

    #[error(transparent)]
    #[diagnostic(code(cfmail::record_update))]
    RecordUpdate(CoreError),

    #[error("Aborted")]
    #[diagnostic(
        code(cfmail::aborted),
        help("Records confirmed before the abort were deleted; nothing was created.")
    )]
    Aborted,

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cfmail::validation))]
    Validation { field: String, reason: String },

    #[error("{0}")]
    #[diagnostic(
        code(cfmail::config),
        help("Check the config file and CFMAIL_* environment variables.")
    )]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(cfmail::api))]
    Api(cfmail_api::Error),

    // ── Serialization ────────────────────────────────────────────────

    #[error("Failed to serialize output: {0}")]
    #[diagnostic(code(cfmail::serialize))]
    Serialize(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidCredentials { .. } | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ZoneNotFound { .. } => exit_code::NOT_FOUND,
            Self::RecordsExist { .. } => exit_code::CONFLICT,
            Self::ConnectionFailed { .. } | Self::ZoneLookup { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── API error classification ─────────────────────────────────────────

/// Failures that get their own diagnostic whichever step hit them.
enum TransportKind {
    Auth(String),
    Timeout,
    Connect,
}

fn transport_kind(err: &cfmail_api::Error) -> Option<TransportKind> {
    if let cfmail_api::Error::Authentication { message } = err {
        Some(TransportKind::Auth(message.clone()))
    } else if err.is_timeout() {
        Some(TransportKind::Timeout)
    } else if err.is_connect() {
        Some(TransportKind::Connect)
    } else {
        None
    }
}

impl CliError {
    fn from_transport<E>(kind: TransportKind, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match kind {
            TransportKind::Auth(message) => Self::AuthFailed { message },
            TransportKind::Timeout => Self::Timeout {
                source: Box::new(err),
            },
            TransportKind::Connect => Self::ConnectionFailed {
                source: Box::new(err),
            },
        }
    }
}

impl From<cfmail_api::Error> for CliError {
    fn from(err: cfmail_api::Error) -> Self {
        match transport_kind(&err) {
            Some(kind) => Self::from_transport(kind, err),
            None => Self::Api(err),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if let Some(kind) = err.api_error().and_then(transport_kind) {
            return Self::from_transport(kind, err);
        }

        match err {
            CoreError::ZoneNotFound { name } => Self::ZoneNotFound { name },
            CoreError::Aborted => Self::Aborted,
            lookup @ CoreError::ZoneLookup { .. } => Self::ZoneLookup { source: lookup },
            other => Self::RecordUpdate(other),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidCredentials { reason } => Self::InvalidCredentials { reason },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Figment(e) => Self::Config(e.to_string()),
        }
    }
}
