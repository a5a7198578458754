#![allow(clippy::unwrap_used)]
// Reconciler tests against an in-memory zone and a scripted presenter.

use std::cell::RefCell;
use std::collections::VecDeque;

use pretty_assertions::assert_eq;

use cfmail_api::{DnsRecord, Error, NewRecord, RecordType, Zone};
use cfmail_core::{
    Confirmation, CoreError, MxScope, Outcome, Presence, Presenter, ReconcileOptions,
    RecordCategory, ReplacementSet, TxtQuoting, ZoneApi, reconcile, resolve_zone_id,
};

// ── Fakes ───────────────────────────────────────────────────────────

const ZONE_NAME: &str = "example.com";
const ZONE_ID: &str = "zone-123";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    ListZones,
    ListRecords,
    Create(String, String),
    Delete(String),
}

#[derive(Default)]
struct FakeZone {
    records: RefCell<Vec<DnsRecord>>,
    calls: RefCell<Vec<Call>>,
    next_id: RefCell<u32>,
    fail_list_zones: bool,
    fail_delete: Option<String>,
    fail_create_after: Option<usize>,
}

impl FakeZone {
    fn with_records(records: Vec<DnsRecord>) -> Self {
        Self {
            records: RefCell::new(records),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Create(..) | Call::Delete(_)))
            .collect()
    }

    fn ids(&self) -> Vec<String> {
        self.records.borrow().iter().map(|r| r.id.clone()).collect()
    }
}

fn api_error(message: &str) -> Error {
    Error::Api {
        status: 500,
        message: message.into(),
    }
}

impl ZoneApi for FakeZone {
    async fn list_zones(&self) -> Result<Vec<Zone>, Error> {
        self.calls.borrow_mut().push(Call::ListZones);
        if self.fail_list_zones {
            return Err(api_error("zones unavailable"));
        }
        Ok(vec![
            Zone {
                id: "zone-other".into(),
                name: "example.org".into(),
                status: None,
            },
            Zone {
                id: ZONE_ID.into(),
                name: ZONE_NAME.into(),
                status: Some("active".into()),
            },
        ])
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, Error> {
        assert_eq!(zone_id, ZONE_ID);
        self.calls.borrow_mut().push(Call::ListRecords);
        Ok(self.records.borrow().clone())
    }

    async fn create_record(&self, zone_id: &str, record: &NewRecord) -> Result<DnsRecord, Error> {
        assert_eq!(zone_id, ZONE_ID);
        let created_so_far = self
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Create(..)))
            .count();
        self.calls.borrow_mut().push(Call::Create(
            record.record_type.to_string(),
            record.name.clone(),
        ));
        if self.fail_create_after == Some(created_so_far) {
            return Err(api_error("create rejected"));
        }

        let mut next = self.next_id.borrow_mut();
        *next += 1;
        let stored = DnsRecord {
            id: format!("new-{next}"),
            name: record.name.clone(),
            record_type: record.record_type.clone(),
            content: record.content.clone(),
            zone_id: Some(ZONE_ID.into()),
            zone_name: Some(ZONE_NAME.into()),
            priority: record.priority,
            proxiable: Some(false),
            proxied: record.proxied,
            ttl: record.ttl,
            comment: record.comment.clone(),
            created_on: None,
            modified_on: None,
        };
        self.records.borrow_mut().push(stored.clone());
        Ok(stored)
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<(), Error> {
        assert_eq!(zone_id, ZONE_ID);
        self.calls
            .borrow_mut()
            .push(Call::Delete(record_id.to_owned()));
        if self.fail_delete.as_deref() == Some(record_id) {
            return Err(api_error("delete rejected"));
        }
        self.records.borrow_mut().retain(|r| r.id != record_id);
        Ok(())
    }
}

/// Records every presenter callback and answers prompts from a script.
#[derive(Default)]
struct ScriptedPresenter {
    answers: VecDeque<Confirmation>,
    presence: Vec<Presence>,
    listings: Vec<Vec<String>>,
    refused: bool,
    prompted: Vec<(String, Vec<RecordCategory>)>,
}

impl ScriptedPresenter {
    fn answering(answers: &[Confirmation]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn prompted_ids(&self) -> Vec<String> {
        self.prompted.iter().map(|(id, _)| id.clone()).collect()
    }
}

impl Presenter for ScriptedPresenter {
    fn presence(&mut self, presence: Presence) {
        self.presence.push(presence);
    }

    fn records(&mut self, records: &[DnsRecord]) {
        self.listings
            .push(records.iter().map(|r| r.id.clone()).collect());
    }

    fn records_exist(&mut self, _presence: Presence) {
        self.refused = true;
    }

    fn confirm_delete(
        &mut self,
        record: &DnsRecord,
        categories: &[RecordCategory],
    ) -> Confirmation {
        self.prompted.push((record.id.clone(), categories.to_vec()));
        self.answers.pop_front().unwrap_or(Confirmation::Declined)
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

fn record(id: &str, name: &str, record_type: RecordType, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.into(),
        name: name.into(),
        record_type,
        content: content.into(),
        zone_id: Some(ZONE_ID.into()),
        zone_name: Some(ZONE_NAME.into()),
        priority: None,
        proxiable: Some(false),
        proxied: Some(false),
        ttl: Some(3600),
        comment: None,
        created_on: None,
        modified_on: None,
    }
}

fn other_records() -> Vec<DnsRecord> {
    vec![
        record("a1", ZONE_NAME, RecordType::A, "192.0.2.10"),
        record("a2", "www.example.com", RecordType::A, "192.0.2.11"),
        record("aaaa1", ZONE_NAME, RecordType::Aaaa, "2001:db8::10"),
        record("cname1", "blog.example.com", RecordType::Cname, ZONE_NAME),
    ]
}

fn email_records() -> Vec<DnsRecord> {
    let mut mx01 = record("mx1", ZONE_NAME, RecordType::Mx, "mx01.mail.example.com");
    mx01.priority = Some(10);
    let mut mx02 = record("mx2", ZONE_NAME, RecordType::Mx, "mx02.mail.example.com");
    mx02.priority = Some(10);
    vec![
        mx02,
        mx01,
        record(
            "spf1",
            ZONE_NAME,
            RecordType::Txt,
            "\"v=spf1 include:_spf.example.net ~all\"",
        ),
        record(
            "dkim1",
            "*._domainkey.example.com",
            RecordType::Txt,
            "\"v=DKIM1; p=\"",
        ),
    ]
}

fn expected_creates() -> Vec<Call> {
    vec![
        Call::Create("MX".into(), "@".into()),
        Call::Create("MX".into(), "*".into()),
        Call::Create("TXT".into(), "@".into()),
        Call::Create("TXT".into(), "*._domainkey".into()),
        Call::Create("TXT".into(), "_dmarc".into()),
    ]
}

fn options(print_only: bool, force: bool) -> ReconcileOptions {
    ReconcileOptions {
        print_only,
        force,
        replacement: ReplacementSet::default(),
    }
}

// ── Zone resolution ─────────────────────────────────────────────────

#[tokio::test]
async fn resolves_zone_by_exact_name() {
    let api = FakeZone::default();
    assert_eq!(resolve_zone_id(&api, ZONE_NAME).await.unwrap(), ZONE_ID);
}

#[tokio::test]
async fn zone_name_match_is_case_sensitive() {
    let api = FakeZone::default();
    let err = resolve_zone_id(&api, "Example.com").await.unwrap_err();
    assert!(
        matches!(err, CoreError::ZoneNotFound { ref name } if name == "Example.com"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn unknown_zone_stops_before_listing_records() {
    let api = FakeZone::with_records(email_records());
    let mut presenter = ScriptedPresenter::default();

    let err = reconcile(&api, &mut presenter, "missing.example", &options(false, true))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::ZoneNotFound { .. }));
    assert_eq!(api.calls(), vec![Call::ListZones]);
    assert!(presenter.presence.is_empty());
}

#[tokio::test]
async fn zone_lookup_failure_is_reported_as_lookup_error() {
    let api = FakeZone {
        fail_list_zones: true,
        ..FakeZone::default()
    };
    let mut presenter = ScriptedPresenter::default();

    let err = reconcile(&api, &mut presenter, ZONE_NAME, &options(true, false))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::ZoneLookup { .. }), "got: {err:?}");
    assert!(err.api_error().is_some());
}

// ── Print-only ──────────────────────────────────────────────────────

#[tokio::test]
async fn print_only_reports_and_lists_without_mutation() {
    let mut records = other_records();
    records.extend(email_records());
    let api = FakeZone::with_records(records);
    let mut presenter = ScriptedPresenter::default();

    let outcome = reconcile(&api, &mut presenter, ZONE_NAME, &options(true, true))
        .await
        .unwrap();

    let presence = Presence {
        mx: true,
        spf: true,
        dkim: true,
        dmarc: false,
    };
    assert_eq!(outcome, Outcome::PrintOnly { presence });
    assert_eq!(presenter.presence, vec![presence]);
    assert_eq!(presenter.listings.len(), 1);
    assert_eq!(presenter.listings[0].len(), 8);
    assert!(api.mutations().is_empty());
    assert!(presenter.prompted.is_empty());
}

// ── Safety gate ─────────────────────────────────────────────────────

#[tokio::test]
async fn existing_records_without_force_are_refused() {
    let mut records = other_records();
    records.extend(email_records());
    let api = FakeZone::with_records(records);
    let mut presenter = ScriptedPresenter::answering(&[Confirmation::Confirmed; 8]);

    let outcome = reconcile(&api, &mut presenter, ZONE_NAME, &options(false, false))
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::Refused { presence } if presence.mx && presence.spf));
    assert!(presenter.refused);
    assert_eq!(presenter.listings.len(), 1);
    assert!(presenter.prompted.is_empty());
    assert!(api.mutations().is_empty());
}

#[tokio::test]
async fn clean_zone_gets_replacement_set_without_prompts() {
    let api = FakeZone::with_records(other_records());
    let mut presenter = ScriptedPresenter::default();

    let outcome = reconcile(&api, &mut presenter, ZONE_NAME, &options(false, false))
        .await
        .unwrap();

    let Outcome::Applied(report) = outcome else {
        panic!("expected Applied, got {outcome:?}");
    };
    assert_eq!(report.presence, Presence::default());
    assert!(report.deleted.is_empty());
    assert_eq!(report.created.len(), 5);
    assert_eq!(report.records.len(), 9);
    assert!(presenter.prompted.is_empty());
    assert_eq!(api.mutations(), expected_creates());
    // Final listing comes from a fresh fetch.
    assert_eq!(api.calls().last(), Some(&Call::ListRecords));
}

// ── Forced replacement ──────────────────────────────────────────────

#[tokio::test]
async fn force_with_all_confirmed_deletes_then_creates_once_each() {
    let mut records = other_records();
    records.extend(email_records());
    let api = FakeZone::with_records(records);
    let mut presenter = ScriptedPresenter::answering(&[Confirmation::Confirmed; 4]);

    let outcome = reconcile(&api, &mut presenter, ZONE_NAME, &options(false, true))
        .await
        .unwrap();

    let Outcome::Applied(report) = outcome else {
        panic!("expected Applied, got {outcome:?}");
    };

    // MX bucket first (provider order), then SPF, then DKIM.
    assert_eq!(presenter.prompted_ids(), vec!["mx2", "mx1", "spf1", "dkim1"]);

    let mut expected = vec![
        Call::Delete("mx2".into()),
        Call::Delete("mx1".into()),
        Call::Delete("spf1".into()),
        Call::Delete("dkim1".into()),
    ];
    expected.extend(expected_creates());
    assert_eq!(api.mutations(), expected);

    assert_eq!(report.deleted.len(), 4);
    assert!(report.skipped.is_empty());
    assert_eq!(
        api.ids(),
        vec!["a1", "a2", "aaaa1", "cname1", "new-1", "new-2", "new-3", "new-4", "new-5"]
    );
    assert_eq!(presenter.listings.last().unwrap().len(), 9);
}

#[tokio::test]
async fn declined_records_stay_and_creation_still_happens() {
    let api = FakeZone::with_records(email_records());
    let mut presenter = ScriptedPresenter::answering(&[
        Confirmation::Declined,
        Confirmation::Confirmed,
        Confirmation::Declined,
        Confirmation::Confirmed,
    ]);

    let outcome = reconcile(&api, &mut presenter, ZONE_NAME, &options(false, true))
        .await
        .unwrap();

    let Outcome::Applied(report) = outcome else {
        panic!("expected Applied, got {outcome:?}");
    };
    let deleted: Vec<_> = report.deleted.iter().map(|r| r.id.as_str()).collect();
    let skipped: Vec<_> = report.skipped.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(deleted, vec!["mx1", "dkim1"]);
    assert_eq!(skipped, vec!["mx2", "spf1"]);
    assert!(api.ids().contains(&"mx2".to_string()));
    assert!(api.ids().contains(&"spf1".to_string()));
    assert_eq!(report.created.len(), 5);
}

#[tokio::test]
async fn record_in_two_buckets_is_prompted_once() {
    let api = FakeZone::with_records(vec![record(
        "dmarc1",
        "_dmarc.example.com",
        RecordType::Txt,
        "\"v=DMARC1;p=reject;sp=reject;adkim=s;aspf=s\"",
    )]);
    let mut presenter = ScriptedPresenter::answering(&[Confirmation::Confirmed]);

    let outcome = reconcile(&api, &mut presenter, ZONE_NAME, &options(false, true))
        .await
        .unwrap();

    // `aspf=s` also matches the SPF marker.
    let Outcome::Applied(report) = outcome else {
        panic!("expected Applied, got {outcome:?}");
    };
    assert!(report.presence.spf && report.presence.dmarc);
    assert_eq!(
        presenter.prompted,
        vec![(
            "dmarc1".to_string(),
            vec![RecordCategory::Spf, RecordCategory::Dmarc]
        )]
    );
    assert_eq!(
        api.mutations()
            .iter()
            .filter(|c| matches!(c, Call::Delete(_)))
            .count(),
        1
    );
}

#[tokio::test]
async fn abort_stops_before_any_creation() {
    let api = FakeZone::with_records(email_records());
    let mut presenter =
        ScriptedPresenter::answering(&[Confirmation::Confirmed, Confirmation::Aborted]);

    let err = reconcile(&api, &mut presenter, ZONE_NAME, &options(false, true))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Aborted));
    assert_eq!(api.mutations(), vec![Call::Delete("mx2".into())]);
}

// ── Failure propagation ─────────────────────────────────────────────

#[tokio::test]
async fn delete_failure_stops_the_run() {
    let api = FakeZone {
        fail_delete: Some("mx1".into()),
        ..FakeZone::with_records(email_records())
    };
    let mut presenter = ScriptedPresenter::answering(&[Confirmation::Confirmed; 4]);

    let err = reconcile(&api, &mut presenter, ZONE_NAME, &options(false, true))
        .await
        .unwrap_err();

    match err {
        CoreError::DeleteRecord { ref record_id, .. } => assert_eq!(record_id, "mx1"),
        other => panic!("expected DeleteRecord, got {other:?}"),
    }
    // mx2 was already gone; nothing after mx1 was attempted.
    assert_eq!(
        api.mutations(),
        vec![Call::Delete("mx2".into()), Call::Delete("mx1".into())]
    );
    assert_eq!(presenter.prompted_ids(), vec!["mx2", "mx1"]);
}

#[tokio::test]
async fn create_failure_stops_the_run_without_rollback() {
    let api = FakeZone {
        fail_create_after: Some(2),
        ..FakeZone::with_records(other_records())
    };
    let mut presenter = ScriptedPresenter::default();

    let err = reconcile(&api, &mut presenter, ZONE_NAME, &options(false, false))
        .await
        .unwrap_err();

    match err {
        CoreError::CreateRecord {
            ref name,
            ref record_type,
            ..
        } => {
            assert_eq!(name, "@");
            assert_eq!(record_type, "TXT");
        }
        other => panic!("expected CreateRecord, got {other:?}"),
    }
    // Both MX records stay in place.
    assert_eq!(api.ids().len(), 6);
    assert_eq!(api.mutations(), expected_creates()[..3].to_vec());
}

#[tokio::test]
async fn root_scope_and_bare_txt_are_honored() {
    let api = FakeZone::with_records(Vec::new());
    let mut presenter = ScriptedPresenter::default();
    let opts = ReconcileOptions {
        print_only: false,
        force: false,
        replacement: ReplacementSet::new(MxScope::Root, TxtQuoting::Bare),
    };

    let outcome = reconcile(&api, &mut presenter, ZONE_NAME, &opts)
        .await
        .unwrap();

    let Outcome::Applied(report) = outcome else {
        panic!("expected Applied, got {outcome:?}");
    };
    let contents: Vec<_> = report.created.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            ".",
            "v=spf1 -all",
            "v=DKIM1; p=",
            "v=DMARC1;p=reject;sp=reject;adkim=s;aspf=s"
        ]
    );
}
