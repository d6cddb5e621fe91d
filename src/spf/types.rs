use crate::score::ScoringResult;

/// How one record entered the resolution chain.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpfRecordKind {
    Initial,
    Include,
    Redirect,
}

/// One SPF record encountered while walking the include/redirect chain.
/// Ordering is significant: the first occurrence is the root record.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfRecordOccurrence {
    pub domain: String,
    pub raw_record: String,
    pub kind: SpfRecordKind,
}

/// Qualifier of an `all` mechanism.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpfQualifier {
    Pass,
    Fail,
    SoftFail,
    Neutral,
}

impl SpfQualifier {
    pub(crate) fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Pass),
            '-' => Some(Self::Fail),
            '~' => Some(Self::SoftFail),
            '?' => Some(Self::Neutral),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Pass => '+',
            Self::Fail => '-',
            Self::SoftFail => '~',
            Self::Neutral => '?',
        }
    }
}

/// A validation issue tied to the record it was found in.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfCheckError {
    pub occurrence: SpfRecordOccurrence,
    pub message: String,
}

/// One named pass/fail check with the issues that made it fail.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfCheck {
    pub is_valid: bool,
    pub errors: Vec<SpfCheckError>,
}

impl SpfCheck {
    pub(crate) fn passed() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub(crate) fn from_errors(errors: Vec<SpfCheckError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Aggregate rule-validation report over a resolved chain.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfValidationReport {
    pub has_spf_record: SpfCheck,
    pub syntax_validation: SpfCheck,
    pub one_initial_spf_record: SpfCheck,
    pub max_ten_spf_records: SpfCheck,
    pub deprecated_mechanisms: SpfCheck,
    pub unsafe_all_mechanism: SpfCheck,
    pub first_all_qualifier: Option<SpfQualifier>,
}

/// Everything the SPF pipeline produces for one domain.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfOutcome {
    pub occurrences: Vec<SpfRecordOccurrence>,
    pub report: SpfValidationReport,
    pub scoring: ScoringResult,
}
