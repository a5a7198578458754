//! Email-record classification and reconciliation for a single DNS zone.
//!
//! - **[`classify`]**: partitions a zone's records into MX / SPF / DKIM /
//!   DMARC buckets by record type and case-sensitive content markers. A TXT
//!   record may land in more than one bucket.
//!
//! - **[`ReplacementSet`]**: the null MX, SPF `-all`, empty DKIM key and
//!   rejecting DMARC records that mark a domain as mail-free.
//!
//! - **[`reconcile()`]**: one sequential run: resolve the zone, report which
//!   categories exist, refuse or proceed per the `force` flag, delete what the
//!   operator confirms and create the replacement set. Remote calls go
//!   through [`ZoneApi`]; output and prompts through [`Presenter`].

pub mod classify;
pub mod error;
pub mod reconcile;
pub mod replacement;
pub mod zone_api;

// ── Primary re-exports ──────────────────────────────────────────────
pub use classify::{Classified, Presence, RecordCategory, categories_of, classify};
pub use error::CoreError;
pub use reconcile::{
    ApplyReport, Confirmation, Outcome, Presenter, ReconcileOptions, list_zones, reconcile,
    resolve_zone_id,
};
pub use replacement::{MxScope, Replacement, ReplacementSet, TxtQuoting};
pub use zone_api::ZoneApi;

pub use cfmail_api::{DnsRecord, RecordType, Zone};
