use crate::score::{ScoreItem, ScoringResult};

use super::types::{SpfQualifier, SpfValidationReport};

/// Converts a validation report into the weighted 0-100 posture score.
pub fn score(report: &SpfValidationReport) -> ScoringResult {
    let items = vec![
        ScoreItem::pass_fail(
            "spf_present",
            "An SPF record is published",
            10,
            report.has_spf_record.is_valid,
        ),
        ScoreItem::pass_fail(
            "single_initial_record",
            "Exactly one SPF record at the root domain",
            5,
            report.one_initial_spf_record.is_valid,
        ),
        ScoreItem::pass_fail(
            "syntax_valid",
            "Every record in the chain parses cleanly",
            5,
            report.syntax_validation.is_valid,
        ),
        ScoreItem::pass_fail(
            "lookups_under_limit",
            "Include/redirect chain stays under the lookup ceiling",
            5,
            report.max_ten_spf_records.is_valid,
        ),
        ScoreItem::pass_fail(
            "no_unsafe_all",
            "No '+all' mechanism anywhere in the chain",
            5,
            report.unsafe_all_mechanism.is_valid,
        ),
        all_qualifier_item(report.first_all_qualifier),
        ScoreItem::pass_fail(
            "no_deprecated_mechanisms",
            "No deprecated 'ptr' mechanism",
            5,
            report.deprecated_mechanisms.is_valid,
        ),
    ];
    ScoringResult::from_items(items)
}

fn all_qualifier_item(qualifier: Option<SpfQualifier>) -> ScoreItem {
    let (points, details) = match qualifier {
        Some(SpfQualifier::Fail) => (5, "hard fail (-all)"),
        Some(SpfQualifier::SoftFail) => (3, "soft fail (~all)"),
        Some(SpfQualifier::Neutral) => (0, "neutral (?all)"),
        Some(SpfQualifier::Pass) => (0, "pass (+all)"),
        None => (0, "no 'all' mechanism"),
    };
    ScoreItem::partial(
        "all_qualifier_policy",
        "Default policy for unmatched senders",
        5,
        points,
        Some(details.to_string()),
    )
}
