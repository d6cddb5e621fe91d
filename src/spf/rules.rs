use super::syntax::validate_syntax;
use super::types::{
    SpfCheck, SpfCheckError, SpfQualifier, SpfRecordKind, SpfRecordOccurrence,
    SpfValidationReport,
};

/// How many chained records (include + redirect) the RFC lookup ceiling
/// tolerates.
const MAX_CHAINED_RECORDS: usize = 10;

/// Aggregates per-record syntax validation and chain-level rules into one
/// report.
pub fn validate(occurrences: &[SpfRecordOccurrence]) -> SpfValidationReport {
    SpfValidationReport {
        has_spf_record: SpfCheck {
            is_valid: !occurrences.is_empty(),
            errors: Vec::new(),
        },
        syntax_validation: syntax_check(occurrences),
        one_initial_spf_record: initial_record_check(occurrences),
        max_ten_spf_records: chain_length_check(occurrences),
        deprecated_mechanisms: deprecated_check(occurrences),
        unsafe_all_mechanism: unsafe_all_check(occurrences),
        first_all_qualifier: first_all_qualifier(occurrences),
    }
}

fn syntax_check(occurrences: &[SpfRecordOccurrence]) -> SpfCheck {
    let mut errors = Vec::new();
    for occurrence in occurrences {
        for message in validate_syntax(&occurrence.raw_record).errors {
            errors.push(SpfCheckError {
                occurrence: occurrence.clone(),
                message,
            });
        }
    }
    SpfCheck::from_errors(errors)
}

fn initial_record_check(occurrences: &[SpfRecordOccurrence]) -> SpfCheck {
    let initial: Vec<&SpfRecordOccurrence> = occurrences
        .iter()
        .filter(|occurrence| occurrence.kind == SpfRecordKind::Initial)
        .collect();
    if initial.len() == 1 {
        return SpfCheck::passed();
    }
    let errors = initial
        .iter()
        .skip(1)
        .map(|occurrence| SpfCheckError {
            occurrence: (*occurrence).clone(),
            message: "More than one SPF record published at the root domain".to_string(),
        })
        .collect();
    SpfCheck {
        is_valid: false,
        errors,
    }
}

fn chain_length_check(occurrences: &[SpfRecordOccurrence]) -> SpfCheck {
    let chained = occurrences
        .iter()
        .filter(|occurrence| occurrence.kind != SpfRecordKind::Initial)
        .count();
    if chained <= MAX_CHAINED_RECORDS {
        return SpfCheck::passed();
    }
    let errors = occurrences
        .iter()
        .filter(|occurrence| occurrence.kind != SpfRecordKind::Initial)
        .skip(MAX_CHAINED_RECORDS)
        .map(|occurrence| SpfCheckError {
            occurrence: occurrence.clone(),
            message: format!(
                "Chain resolves {chained} records, exceeding the limit of {MAX_CHAINED_RECORDS}"
            ),
        })
        .collect();
    SpfCheck::from_errors(errors)
}

fn deprecated_check(occurrences: &[SpfRecordOccurrence]) -> SpfCheck {
    let mut errors = Vec::new();
    for occurrence in occurrences {
        for term in occurrence.raw_record.split_whitespace().skip(1) {
            let body = term.strip_prefix(['+', '-', '~', '?']).unwrap_or(term);
            if body == "ptr" || body.starts_with("ptr:") {
                errors.push(SpfCheckError {
                    occurrence: occurrence.clone(),
                    message: format!("Deprecated 'ptr' mechanism in '{term}'"),
                });
            }
        }
    }
    SpfCheck::from_errors(errors)
}

fn unsafe_all_check(occurrences: &[SpfRecordOccurrence]) -> SpfCheck {
    let mut errors = Vec::new();
    for occurrence in occurrences {
        if occurrence
            .raw_record
            .split_whitespace()
            .any(|term| term == "+all")
        {
            errors.push(SpfCheckError {
                occurrence: occurrence.clone(),
                message: "'+all' authorizes every sender".to_string(),
            });
        }
    }
    SpfCheck::from_errors(errors)
}

/// First `all` mechanism in resolution order; a bare `all` implies `+`.
fn first_all_qualifier(occurrences: &[SpfRecordOccurrence]) -> Option<SpfQualifier> {
    for occurrence in occurrences {
        for term in occurrence.raw_record.split_whitespace().skip(1) {
            let body = term.strip_prefix(['+', '-', '~', '?']).unwrap_or(term);
            if body != "all" {
                continue;
            }
            if body.len() == term.len() {
                return Some(SpfQualifier::Pass);
            }
            let symbol = term.chars().next()?;
            return SpfQualifier::from_symbol(symbol).or(Some(SpfQualifier::Pass));
        }
    }
    None
}
