use chrono::{DateTime, Utc};

use crate::score::ScoringResult;

/// Tags recognized in a DKIM key record; unknown tags are dropped during
/// parsing, duplicates keep the last value seen.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DkimTags {
    pub version: Option<String>,
    pub algorithm: Option<String>,
    pub key_type: Option<String>,
    pub public_key: Option<String>,
    pub service_type: Option<String>,
    pub flags: Vec<String>,
    pub notes: Option<String>,
}

/// One parsed key record published at `<selector>._domainkey.<domain>`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkimRecord {
    pub domain: String,
    pub selector: String,
    pub raw_record: String,
    pub tags: DkimTags,
    pub retrieved_at: DateTime<Utc>,
}

/// Union of the records found across all discovered selectors.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkimRecordSet {
    pub domain: String,
    pub records: Vec<DkimRecord>,
    pub retrieved_at: DateTime<Utc>,
}

/// The three per-selector RFC checks.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DkimSelectorChecks {
    pub valid_version: bool,
    pub valid_algorithm: bool,
    pub has_public_key: bool,
}

impl DkimSelectorChecks {
    pub fn all_passed(&self) -> bool {
        self.valid_version && self.valid_algorithm && self.has_public_key
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkimSelectorValidation {
    pub selector: String,
    pub checks: DkimSelectorChecks,
    pub is_valid: bool,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkimValidationResult {
    pub is_valid: bool,
    pub selectors: Vec<DkimSelectorValidation>,
    pub issues: Vec<String>,
}

/// Everything the DKIM pipeline produces for one domain.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkimOutcome {
    pub record_set: DkimRecordSet,
    pub validation: DkimValidationResult,
    pub scoring: ScoringResult,
}
