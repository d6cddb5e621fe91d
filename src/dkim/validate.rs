use super::types::{
    DkimRecordSet, DkimSelectorChecks, DkimSelectorValidation, DkimValidationResult,
};

const KNOWN_ALGORITHMS: &[&str] = &["rsa-sha256", "rsa-sha1"];

/// Runs the per-selector RFC checks and folds in domain-level issues.
///
/// A domain is valid when at least one selector passes every check and no
/// domain-level issue (no records, unparsable records) was recorded.
pub fn validate(record_set: &DkimRecordSet, extra_issues: Vec<String>) -> DkimValidationResult {
    let mut issues = extra_issues;
    if record_set.records.is_empty() {
        issues.push(format!(
            "No DKIM records found for {} on any probed selector",
            record_set.domain
        ));
    }

    let selectors: Vec<DkimSelectorValidation> = record_set
        .records
        .iter()
        .map(|record| {
            let checks = DkimSelectorChecks {
                valid_version: record.tags.version.as_deref() == Some("DKIM1"),
                valid_algorithm: record
                    .tags
                    .algorithm
                    .as_deref()
                    .is_none_or(|algorithm| KNOWN_ALGORITHMS.contains(&algorithm)),
                has_public_key: record
                    .tags
                    .public_key
                    .as_deref()
                    .is_some_and(|key| !key.trim().is_empty()),
            };
            DkimSelectorValidation {
                selector: record.selector.clone(),
                is_valid: checks.all_passed(),
                checks,
            }
        })
        .collect();

    let any_selector_valid = selectors.iter().any(|selector| selector.is_valid);
    DkimValidationResult {
        is_valid: any_selector_valid && issues.is_empty(),
        selectors,
        issues,
    }
}
