// ── Policy reconciler ──
//
// Drives one run against one zone: resolve, fetch, classify, report,
// then either stop (print-only / existing records without force) or
// delete what the operator confirms and install the replacement set.
// Every remote failure ends the run; nothing is rolled back.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use cfmail_api::{DnsRecord, Zone};

use crate::classify::{Classified, Presence, RecordCategory, categories_of, classify};
use crate::error::CoreError;
use crate::replacement::ReplacementSet;
use crate::zone_api::ZoneApi;

/// Operator answer to a per-record deletion prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Delete the record.
    Confirmed,
    /// Keep the record and move on.
    Declined,
    /// Stop the run; nothing further is deleted or created.
    Aborted,
}

/// Output and interaction surface used during a run.
///
/// The CLI renders tables and asks on the terminal; tests script the answers.
pub trait Presenter {
    /// Per-category existence summary. Always called once per run.
    fn presence(&mut self, presence: Presence);

    /// A full record listing for the zone.
    fn records(&mut self, records: &[DnsRecord]);

    /// Existing email records block the run because `force` is off.
    fn records_exist(&mut self, presence: Presence);

    /// Ask whether `record` should be deleted.
    fn confirm_delete(
        &mut self,
        record: &DnsRecord,
        categories: &[RecordCategory],
    ) -> Confirmation;

    fn deleted(&mut self, _record: &DnsRecord) {}

    fn created(&mut self, _record: &DnsRecord) {}
}

/// Flags and the record set for one run.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Report and list only; never mutate.
    pub print_only: bool,
    /// Proceed even when email records already exist.
    pub force: bool,
    pub replacement: ReplacementSet,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    PrintOnly { presence: Presence },
    /// Email records exist and `force` was not set. No remote mutation happened.
    Refused { presence: Presence },
    Applied(ApplyReport),
}

/// What a mutating run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub presence: Presence,
    pub deleted: Vec<DnsRecord>,
    pub skipped: Vec<DnsRecord>,
    pub created: Vec<DnsRecord>,
    /// Zone contents re-fetched after all creations.
    pub records: Vec<DnsRecord>,
}

/// List every zone visible to the account.
pub async fn list_zones(api: &impl ZoneApi) -> Result<Vec<Zone>, CoreError> {
    api.list_zones()
        .await
        .map_err(|source| CoreError::ZoneLookup { source })
}

/// Resolve a zone name to its provider ID (exact, case-sensitive match).
pub async fn resolve_zone_id(api: &impl ZoneApi, name: &str) -> Result<String, CoreError> {
    debug!(zone = name, "resolving zone id");
    let zones = list_zones(api).await?;
    let zone_id = zones
        .into_iter()
        .find(|z| z.name == name)
        .map(|z| z.id)
        .ok_or_else(|| CoreError::ZoneNotFound { name: name.into() })?;
    debug!(zone = name, %zone_id, "zone resolved");
    Ok(zone_id)
}

async fn fetch_records(api: &impl ZoneApi, zone_id: &str) -> Result<Vec<DnsRecord>, CoreError> {
    api.list_records(zone_id)
        .await
        .map_err(|source| CoreError::ZoneLookup { source })
}

/// Run the full classify / decide / delete / create sequence for one zone.
pub async fn reconcile<A, P>(
    api: &A,
    presenter: &mut P,
    zone_name: &str,
    options: &ReconcileOptions,
) -> Result<Outcome, CoreError>
where
    A: ZoneApi,
    P: Presenter,
{
    let zone_id = resolve_zone_id(api, zone_name).await?;
    let records = fetch_records(api, &zone_id).await?;
    debug!(zone = zone_name, count = records.len(), "records retrieved");

    let classified = classify(&records);
    let presence = classified.presence();
    presenter.presence(presence);

    if options.print_only {
        presenter.records(&records);
        return Ok(Outcome::PrintOnly { presence });
    }

    if presence.any() && !options.force {
        info!(zone = zone_name, "email records exist, refusing without force");
        presenter.records_exist(presence);
        presenter.records(&records);
        return Ok(Outcome::Refused { presence });
    }

    let mut report = ApplyReport {
        presence,
        ..ApplyReport::default()
    };

    delete_existing(api, presenter, &zone_id, &classified, &mut report).await?;

    for replacement in options.replacement.records() {
        let new = &replacement.record;
        let created = api.create_record(&zone_id, new).await.map_err(|source| {
            CoreError::CreateRecord {
                name: new.name.clone(),
                record_type: new.record_type.to_string(),
                source,
            }
        })?;
        info!(
            name = %created.name,
            record_type = %created.record_type,
            "created {} record",
            replacement.category
        );
        presenter.created(&created);
        report.created.push(created);
    }

    report.records = fetch_records(api, &zone_id).await?;
    presenter.records(&report.records);

    Ok(Outcome::Applied(report))
}

/// Prompt for and delete each classified record, once per record even
/// when it sits in several buckets.
async fn delete_existing<A, P>(
    api: &A,
    presenter: &mut P,
    zone_id: &str,
    classified: &Classified<'_>,
    report: &mut ApplyReport,
) -> Result<(), CoreError>
where
    A: ZoneApi,
    P: Presenter,
{
    let mut seen: HashSet<&str> = HashSet::new();

    for (category, bucket) in classified.iter() {
        for &record in bucket {
            if !seen.insert(record.id.as_str()) {
                debug!(record_id = %record.id, %category, "already handled");
                continue;
            }

            match presenter.confirm_delete(record, &categories_of(record)) {
                Confirmation::Confirmed => {
                    api.delete_record(zone_id, &record.id)
                        .await
                        .map_err(|source| CoreError::DeleteRecord {
                            record_id: record.id.clone(),
                            name: record.name.clone(),
                            record_type: record.record_type.to_string(),
                            source,
                        })?;
                    info!(record_id = %record.id, name = %record.name, "deleted {category} record");
                    presenter.deleted(record);
                    report.deleted.push(record.clone());
                }
                Confirmation::Declined => {
                    warn!(record_id = %record.id, name = %record.name, "kept {category} record");
                    report.skipped.push(record.clone());
                }
                Confirmation::Aborted => {
                    warn!("run aborted at deletion prompt");
                    return Err(CoreError::Aborted);
                }
            }
        }
    }

    Ok(())
}
