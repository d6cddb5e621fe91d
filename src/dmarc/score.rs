use crate::score::{ScoreItem, ScoringResult};

use super::types::{DmarcRecord, DmarcTags};
use super::validate::POLICIES;

/// Weighted DMARC posture score: presence, policy strength, subdomain
/// coverage, alignment, reporting, and enforcement percentage.
pub fn score(record: Option<&DmarcRecord>) -> ScoringResult {
    let tags = record.map(|record| &record.tags);
    let items = vec![
        ScoreItem::pass_fail(
            "dmarc_present",
            "A DMARC record is published",
            10,
            record.is_some(),
        ),
        policy_item(tags),
        subdomain_item(tags),
        alignment_item(tags),
        reporting_item(tags),
        percentage_item(tags),
    ];
    ScoringResult::from_items(items)
}

fn policy_item(tags: Option<&DmarcTags>) -> ScoreItem {
    let policy = tags.and_then(|tags| tags.policy.as_deref());
    let points = match policy {
        Some("reject") => 10,
        Some("quarantine") => 8,
        Some("none") => 3,
        _ => 0,
    };
    ScoreItem::partial(
        "policy_enforcement",
        "Strength of the declared policy",
        10,
        points,
        policy.map(|policy| format!("p={policy}")),
    )
}

/// Full credit when subdomains inherit the policy or get an equal-or-stronger
/// one of their own.
fn subdomain_item(tags: Option<&DmarcTags>) -> ScoreItem {
    let passed = tags.is_some_and(|tags| match tags.subdomain_policy.as_deref() {
        None => true,
        Some(subdomain_policy) => {
            let policy = tags.policy.as_deref().unwrap_or("none");
            policy_rank(subdomain_policy) >= policy_rank(policy)
        }
    });
    ScoreItem::pass_fail(
        "subdomain_coverage",
        "Subdomains are covered at least as strictly as the domain",
        5,
        passed,
    )
}

fn policy_rank(policy: &str) -> usize {
    POLICIES
        .iter()
        .position(|known| *known == policy)
        .unwrap_or(0)
}

fn alignment_item(tags: Option<&DmarcTags>) -> ScoreItem {
    let passed = tags.is_some_and(|tags| {
        let spf = tags.alignment_spf.as_deref().unwrap_or("r");
        let dkim = tags.alignment_dkim.as_deref().unwrap_or("r");
        matches!(spf, "r" | "s") && matches!(dkim, "r" | "s")
    });
    ScoreItem::pass_fail(
        "alignment_mode",
        "SPF and DKIM alignment modes are well-formed",
        5,
        passed,
    )
}

fn reporting_item(tags: Option<&DmarcTags>) -> ScoreItem {
    let passed = tags.is_some_and(|tags| {
        tags.report_emails
            .as_ref()
            .is_some_and(|emails| !emails.is_empty())
    });
    ScoreItem::pass_fail(
        "reporting",
        "Aggregate reports (rua) are collected",
        5,
        passed,
    )
}

/// Enforced policies earn full credit at 100% coverage and partial credit
/// down to 50%; a monitoring policy gets a flat partial score because the
/// percentage does not apply.
fn percentage_item(tags: Option<&DmarcTags>) -> ScoreItem {
    let name = "policy_percentage";
    let description = "Share of mail the policy applies to";
    let Some(tags) = tags else {
        return ScoreItem::partial(name, description, 5, 0, None);
    };
    match tags.policy.as_deref() {
        Some("quarantine" | "reject") => {
            let (points, details) = match tags.percentage {
                None | Some(100) => (5, "full coverage".to_string()),
                Some(pct) if pct >= 50 => (2, format!("partial coverage (pct={pct})")),
                Some(pct) => (0, format!("marginal coverage (pct={pct})")),
            };
            ScoreItem::partial(name, description, 5, points, Some(details))
        }
        Some("none") => ScoreItem::partial(
            name,
            description,
            5,
            2,
            Some("not applicable under p=none".to_string()),
        ),
        _ => ScoreItem::partial(name, description, 5, 0, None),
    }
}
