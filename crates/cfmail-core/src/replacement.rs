// ── Canonical replacement set ──
//
// The records installed to declare "this domain neither sends nor
// receives mail": null MX, SPF `-all`, an empty DKIM key and a
// rejecting DMARC policy.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use cfmail_api::{NewRecord, RecordType};

use crate::classify::RecordCategory;

pub const SPF_REJECT_ALL: &str = "v=spf1 -all";
pub const DKIM_EMPTY_KEY: &str = "v=DKIM1; p=";
pub const DMARC_REJECT_ALL: &str = "v=DMARC1;p=reject;sp=reject;adkim=s;aspf=s";

/// Which hosts receive a null MX record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MxScope {
    /// `@` only.
    Root,
    /// `@` and `*`, so subdomains refuse mail too.
    #[default]
    RootAndWildcard,
}

/// Whether TXT content is sent wrapped in double quotes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TxtQuoting {
    #[default]
    Quoted,
    Bare,
}

impl TxtQuoting {
    fn apply(self, content: &str) -> String {
        match self {
            Self::Quoted => format!("\"{content}\""),
            Self::Bare => content.to_owned(),
        }
    }
}

/// One record of the replacement set, tagged with its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub category: RecordCategory,
    pub record: NewRecord,
}

/// The ordered list of records to create: MX first, then SPF, DKIM, DMARC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementSet {
    records: Vec<Replacement>,
}

impl Default for ReplacementSet {
    fn default() -> Self {
        Self::new(MxScope::default(), TxtQuoting::default())
    }
}

impl ReplacementSet {
    pub fn new(scope: MxScope, quoting: TxtQuoting) -> Self {
        let mut records = vec![null_mx("@", "Null mail server for root domain")];
        if scope == MxScope::RootAndWildcard {
            records.push(null_mx("*", "Null mail server for all subdomains"));
        }

        records.push(txt(
            RecordCategory::Spf,
            "@",
            &quoting.apply(SPF_REJECT_ALL),
            "Reject all senders SPF record",
        ));
        records.push(txt(
            RecordCategory::Dkim,
            "*._domainkey",
            &quoting.apply(DKIM_EMPTY_KEY),
            "Reject all DKIM record",
        ));
        records.push(txt(
            RecordCategory::Dmarc,
            "_dmarc",
            &quoting.apply(DMARC_REJECT_ALL),
            "DMARC reject all record",
        ));

        Self { records }
    }

    pub fn records(&self) -> &[Replacement] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn null_mx(name: &str, comment: &str) -> Replacement {
    Replacement {
        category: RecordCategory::Mx,
        record: NewRecord {
            record_type: RecordType::Mx,
            name: name.into(),
            content: ".".into(),
            priority: Some(0),
            proxied: Some(false),
            ttl: Some(1),
            comment: Some(comment.into()),
        },
    }
}

fn txt(category: RecordCategory, name: &str, content: &str, comment: &str) -> Replacement {
    Replacement {
        category,
        record: NewRecord {
            record_type: RecordType::Txt,
            name: name.into(),
            content: content.into(),
            priority: None,
            proxied: None,
            ttl: None,
            comment: Some(comment.into()),
        },
    }
}
