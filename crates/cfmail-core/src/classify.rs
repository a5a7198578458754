// ── Record classification ──
//
// Partitions a zone's records into the four email-policy categories.
// TXT subtypes are detected by case-sensitive substring markers in the
// record content, nothing more. A TXT record can carry several markers
// and then belongs to several buckets at once.

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

use cfmail_api::{DnsRecord, RecordType};

/// One of the four email-policy record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum RecordCategory {
    #[strum(serialize = "MX")]
    Mx,
    #[strum(serialize = "SPF")]
    Spf,
    #[strum(serialize = "DKIM")]
    Dkim,
    #[strum(serialize = "DMARC")]
    Dmarc,
}

impl RecordCategory {
    /// Content substring identifying a TXT record of this category.
    /// `None` for MX, which is identified by record type alone.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            Self::Mx => None,
            Self::Spf => Some("spf"),
            Self::Dkim => Some("DKIM"),
            Self::Dmarc => Some("DMARC"),
        }
    }

    /// Whether `record` belongs to this category.
    pub fn matches(self, record: &DnsRecord) -> bool {
        match self.marker() {
            None => record.record_type == RecordType::Mx,
            Some(marker) => record.record_type == RecordType::Txt && record.content.contains(marker),
        }
    }
}

/// Every category `record` belongs to, in MX, SPF, DKIM, DMARC order.
pub fn categories_of(record: &DnsRecord) -> Vec<RecordCategory> {
    RecordCategory::iter().filter(|c| c.matches(record)).collect()
}

/// The four category buckets for one zone, borrowing from the record list.
#[derive(Debug, Clone, Default)]
pub struct Classified<'a> {
    mx: Vec<&'a DnsRecord>,
    spf: Vec<&'a DnsRecord>,
    dkim: Vec<&'a DnsRecord>,
    dmarc: Vec<&'a DnsRecord>,
}

/// Classify `records`; each bucket keeps the input order.
pub fn classify(records: &[DnsRecord]) -> Classified<'_> {
    let mut classified = Classified::default();
    for record in records {
        for category in RecordCategory::iter() {
            if category.matches(record) {
                classified.bucket_mut(category).push(record);
            }
        }
    }
    classified
}

impl<'a> Classified<'a> {
    pub fn bucket(&self, category: RecordCategory) -> &[&'a DnsRecord] {
        match category {
            RecordCategory::Mx => &self.mx,
            RecordCategory::Spf => &self.spf,
            RecordCategory::Dkim => &self.dkim,
            RecordCategory::Dmarc => &self.dmarc,
        }
    }

    fn bucket_mut(&mut self, category: RecordCategory) -> &mut Vec<&'a DnsRecord> {
        match category {
            RecordCategory::Mx => &mut self.mx,
            RecordCategory::Spf => &mut self.spf,
            RecordCategory::Dkim => &mut self.dkim,
            RecordCategory::Dmarc => &mut self.dmarc,
        }
    }

    /// `(category, bucket)` pairs in MX, SPF, DKIM, DMARC order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordCategory, &[&'a DnsRecord])> + '_ {
        RecordCategory::iter().map(move |c| (c, self.bucket(c)))
    }

    pub fn presence(&self) -> Presence {
        Presence {
            mx: !self.mx.is_empty(),
            spf: !self.spf.is_empty(),
            dkim: !self.dkim.is_empty(),
            dmarc: !self.dmarc.is_empty(),
        }
    }

    /// True if any category already has a record in the zone.
    pub fn any(&self) -> bool {
        self.presence().any()
    }
}

/// Per-category "already exists" flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Presence {
    pub mx: bool,
    pub spf: bool,
    pub dkim: bool,
    pub dmarc: bool,
}

impl Presence {
    pub fn get(self, category: RecordCategory) -> bool {
        match category {
            RecordCategory::Mx => self.mx,
            RecordCategory::Spf => self.spf,
            RecordCategory::Dkim => self.dkim,
            RecordCategory::Dmarc => self.dmarc,
        }
    }

    pub fn any(self) -> bool {
        self.mx || self.spf || self.dkim || self.dmarc
    }

    pub fn iter(self) -> impl Iterator<Item = (RecordCategory, bool)> {
        RecordCategory::iter().map(move |c| (c, self.get(c)))
    }
}
