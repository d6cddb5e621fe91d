use super::types::{DmarcIssue, DmarcRecord, DmarcSeverity, DmarcValidationResult};

pub(crate) const POLICIES: &[&str] = &["none", "quarantine", "reject"];

/// RFC checks over the parsed record. Version and policy problems are
/// errors; a monitoring-only policy and missing aggregate reporting are
/// warnings.
pub fn validate(record: Option<&DmarcRecord>) -> DmarcValidationResult {
    let Some(record) = record else {
        return DmarcValidationResult {
            is_valid: false,
            issues: vec![DmarcIssue::error("No DMARC record published")],
        };
    };

    let mut issues = Vec::new();
    let tags = &record.tags;

    if tags.version.as_deref() != Some("DMARC1") {
        issues.push(DmarcIssue::error(
            "Version tag must be exactly 'v=DMARC1'",
        ));
    }

    match tags.policy.as_deref() {
        None => issues.push(DmarcIssue::error("Required policy tag 'p=' is missing")),
        Some(policy) if !POLICIES.contains(&policy) => {
            issues.push(DmarcIssue::error(format!(
                "Unknown policy '{policy}', expected none, quarantine or reject"
            )));
        }
        Some("none") => issues.push(DmarcIssue::warning(
            "Policy 'none' only monitors, it does not protect the domain",
        )),
        Some(_) => {}
    }

    for address in tags
        .report_emails
        .iter()
        .chain(tags.forensic_emails.iter())
        .flatten()
    {
        if !is_plausible_address(address) {
            issues.push(DmarcIssue::error(format!(
                "Report address '{address}' is not a valid mailbox"
            )));
        }
    }

    if tags.report_emails.as_ref().is_none_or(Vec::is_empty) {
        issues.push(DmarcIssue::warning(
            "No aggregate report address (rua) configured",
        ));
    }

    let is_valid = !issues
        .iter()
        .any(|issue| issue.severity == DmarcSeverity::Error);
    DmarcValidationResult { is_valid, issues }
}

/// Basic `local@domain` shape: both halves non-empty, a dot in the domain,
/// no whitespace.
fn is_plausible_address(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !address.chars().any(char::is_whitespace)
}
