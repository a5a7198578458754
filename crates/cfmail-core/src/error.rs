// ── Core error types ──
//
// One variant per remote operation, so the operator learns *which* step
// of the run failed. The underlying `cfmail_api::Error` is kept as the
// source for diagnostics and exit-code mapping.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Unable to retrieve zone information: {source}")]
    ZoneLookup {
        #[source]
        source: cfmail_api::Error,
    },

    #[error("Zone '{name}' not found")]
    ZoneNotFound { name: String },

    // ── Mutation errors ──────────────────────────────────────────────
    #[error("Unable to delete {record_type} record '{name}' ({record_id}): {source}")]
    DeleteRecord {
        record_id: String,
        name: String,
        record_type: String,
        #[source]
        source: cfmail_api::Error,
    },

    #[error("Unable to create {record_type} record '{name}': {source}")]
    CreateRecord {
        name: String,
        record_type: String,
        #[source]
        source: cfmail_api::Error,
    },

    // ── Interaction ──────────────────────────────────────────────────
    #[error("Aborted by operator before any records were created")]
    Aborted,
}

impl CoreError {
    /// The transport-layer error behind this failure, if any.
    pub fn api_error(&self) -> Option<&cfmail_api::Error> {
        match self {
            Self::ZoneLookup { source }
            | Self::DeleteRecord { source, .. }
            | Self::CreateRecord { source, .. } => Some(source),
            Self::ZoneNotFound { .. } | Self::Aborted => None,
        }
    }
}
