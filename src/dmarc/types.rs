use chrono::{DateTime, Utc};

use crate::score::ScoringResult;

/// Tags recognized in a DMARC record, normalized during parsing.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DmarcTags {
    pub version: Option<String>,
    pub policy: Option<String>,
    pub subdomain_policy: Option<String>,
    pub percentage: Option<u32>,
    pub report_format: Option<Vec<String>>,
    pub report_interval: Option<u32>,
    pub report_emails: Option<Vec<String>>,
    pub forensic_emails: Option<Vec<String>>,
    pub failure_options: Option<Vec<String>>,
    pub alignment_spf: Option<String>,
    pub alignment_dkim: Option<String>,
}

/// The record published at `_dmarc.<domain>`.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmarcRecord {
    pub domain: String,
    pub raw_record: String,
    pub tags: DmarcTags,
    pub retrieved_at: DateTime<Utc>,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmarcSeverity {
    Error,
    Warning,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmarcIssue {
    pub severity: DmarcSeverity,
    pub message: String,
}

impl DmarcIssue {
    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            severity: DmarcSeverity::Error,
            message: message.into(),
        }
    }

    pub(crate) fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: DmarcSeverity::Warning,
            message: message.into(),
        }
    }
}

/// `is_valid` holds when no Error-severity issue was recorded; warnings are
/// advisory.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmarcValidationResult {
    pub is_valid: bool,
    pub issues: Vec<DmarcIssue>,
}

/// Everything the DMARC pipeline produces for one domain.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmarcOutcome {
    pub record: Option<DmarcRecord>,
    pub validation: DmarcValidationResult,
    pub scoring: ScoringResult,
}
