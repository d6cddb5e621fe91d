use std::collections::HashSet;

use crate::score::{ScoreItem, ScoringResult};

use super::key::key_bits;
use super::types::DkimRecordSet;

const STRONG_KEY_BITS: u32 = 2048;
const WEAK_KEY_BITS: u32 = 1024;

/// Weighted DKIM posture score: implementation presence, key strength,
/// selector rotation, and absence of test mode.
pub fn score(record_set: &DkimRecordSet) -> ScoringResult {
    let implemented = !record_set.records.is_empty();

    let distinct_selectors: HashSet<&str> = record_set
        .records
        .iter()
        .map(|record| record.selector.as_str())
        .collect();

    let test_mode = record_set
        .records
        .iter()
        .any(|record| record.tags.flags.iter().any(|flag| flag == "y"));

    let items = vec![
        ScoreItem::pass_fail("dkim_implemented", "A DKIM key record is published", 10, implemented),
        key_length_item(record_set),
        ScoreItem::pass_fail(
            "multiple_selectors",
            "At least two selectors allow key rotation",
            3,
            distinct_selectors.len() >= 2,
        ),
        ScoreItem::pass_fail(
            "no_test_mode",
            "No selector is flagged as testing (t=y)",
            2,
            !test_mode,
        ),
    ];
    ScoringResult::from_items(items)
}

fn key_length_item(record_set: &DkimRecordSet) -> ScoreItem {
    let bits: Vec<u32> = record_set
        .records
        .iter()
        .filter_map(|record| key_bits(&record.tags))
        .collect();

    let name = "key_length";
    let description = "RSA key strength across published selectors";
    let Some(max_bits) = bits.iter().max().copied() else {
        return ScoreItem::partial(name, description, 5, 0, Some("no parsable key".to_string()));
    };
    let has_weak_key = bits.iter().any(|&b| b < WEAK_KEY_BITS);
    let points = if has_weak_key {
        0
    } else if max_bits >= STRONG_KEY_BITS {
        5
    } else if max_bits >= WEAK_KEY_BITS {
        3
    } else {
        0
    };
    ScoreItem::partial(
        name,
        description,
        5,
        points,
        Some(format!("strongest key: {max_bits} bits")),
    )
}
