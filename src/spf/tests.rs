use proptest::prelude::*;

use crate::resolver::stub::StubResolver;
use crate::score::Grade;

use super::types::{SpfRecordKind, SpfRecordOccurrence};
use super::{SpfQualifier, resolve, score, validate, validate_syntax};

fn occurrence(domain: &str, raw: &str, kind: SpfRecordKind) -> SpfRecordOccurrence {
    SpfRecordOccurrence {
        domain: domain.to_string(),
        raw_record: raw.to_string(),
        kind,
    }
}

#[tokio::test]
async fn resolve_without_record_yields_empty_chain() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", ["not-an-spf-record"]);

    let occurrences = resolve(&stub, "example.com").await.expect("resolution");
    assert!(occurrences.is_empty());

    let report = validate(&occurrences);
    assert!(!report.has_spf_record.is_valid);
}

#[tokio::test]
async fn resolve_strips_quotes_before_version_check() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", ["\"v=spf1 -all\""]);

    let occurrences = resolve(&stub, "example.com").await.expect("resolution");
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].raw_record, "v=spf1 -all");
    assert_eq!(occurrences[0].kind, SpfRecordKind::Initial);
}

#[tokio::test]
async fn resolve_follows_includes_in_textual_order() {
    let mut stub = StubResolver::new();
    stub.insert_records(
        "example.com",
        ["v=spf1 include:a.example include:b.example -all"],
    );
    stub.insert_records("a.example", ["v=spf1 ip4:192.0.2.1 -all"]);
    stub.insert_records("b.example", ["v=spf1 ip4:192.0.2.2 -all"]);

    let occurrences = resolve(&stub, "example.com").await.expect("resolution");
    let domains: Vec<&str> = occurrences.iter().map(|o| o.domain.as_str()).collect();
    assert_eq!(domains, ["example.com", "a.example", "b.example"]);
    assert_eq!(occurrences[1].kind, SpfRecordKind::Include);
    assert_eq!(occurrences[2].kind, SpfRecordKind::Include);
}

#[tokio::test]
async fn resolve_follows_redirect_after_includes() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", ["v=spf1 redirect=target.example"]);
    stub.insert_records("target.example", ["v=spf1 -all"]);

    let occurrences = resolve(&stub, "example.com").await.expect("resolution");
    assert_eq!(occurrences.len(), 2);
    assert_eq!(occurrences[1].domain, "target.example");
    assert_eq!(occurrences[1].kind, SpfRecordKind::Redirect);
}

#[tokio::test]
async fn resolve_terminates_on_self_include() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", ["v=spf1 include:example.com -all"]);

    let occurrences = resolve(&stub, "example.com").await.expect("resolution");
    assert_eq!(occurrences.len(), 1);
}

#[tokio::test]
async fn sibling_includes_share_the_visited_set() {
    let mut stub = StubResolver::new();
    stub.insert_records(
        "example.com",
        ["v=spf1 include:shared.example include:other.example -all"],
    );
    stub.insert_records("shared.example", ["v=spf1 ip4:192.0.2.1 -all"]);
    stub.insert_records("other.example", ["v=spf1 include:shared.example -all"]);

    let occurrences = resolve(&stub, "example.com").await.expect("resolution");
    let shared = occurrences
        .iter()
        .filter(|o| o.domain == "shared.example")
        .count();
    assert_eq!(shared, 1);
}

#[tokio::test]
async fn transport_failure_aborts_the_whole_resolution() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", ["v=spf1 include:broken.example -all"]);
    stub.fail_lookup("broken.example");

    let err = resolve(&stub, "example.com").await.unwrap_err();
    assert!(matches!(
        err,
        crate::CheckError::TxtLookup { ref name, .. } if name == "broken.example"
    ));
}

#[test]
fn syntax_accepts_plain_record() {
    let report = validate_syntax("v=spf1 ip4:192.168.1.1 -all");
    assert!(report.is_valid, "{:?}", report.errors);
    assert!(report.errors.is_empty());
}

#[test]
fn syntax_rejects_out_of_range_ipv4() {
    let report = validate_syntax("v=spf1 ip4:999.999.999.999 -all");
    assert!(!report.is_valid);
    assert!(
        report
            .errors
            .iter()
            .any(|message| message.contains("Invalid IPv4 address"))
    );
}

#[test]
fn syntax_missing_version_is_terminal() {
    let report = validate_syntax("ip4:192.0.2.1 -all");
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("v=spf1"));
}

#[test]
fn syntax_version_check_is_case_sensitive() {
    let report = validate_syntax("V=SPF1 -all");
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn syntax_accumulates_errors_without_short_circuit() {
    let report = validate_syntax("v=spf1 bogus:x include: ip4:1.2.3");
    assert!(!report.is_valid);
    // unknown mechanism, empty include value, bad ip4, bad final term
    assert!(report.errors.len() >= 4, "{:?}", report.errors);
}

#[test]
fn syntax_requires_value_on_modifiers() {
    let report = validate_syntax("v=spf1 redirect=");
    assert!(!report.is_valid);
    assert!(
        report
            .errors
            .iter()
            .any(|message| message.contains("requires a value"))
    );
}

#[test]
fn syntax_accepts_ipv4_prefix_and_ipv6() {
    let report = validate_syntax("v=spf1 ip4:192.0.2.0/24 ip6:2001:db8::1 ~all");
    assert!(report.is_valid, "{:?}", report.errors);
}

#[test]
fn rules_flag_deprecated_ptr() {
    let occurrences = vec![occurrence(
        "example.com",
        "v=spf1 ptr:example.com -all",
        SpfRecordKind::Initial,
    )];
    let report = validate(&occurrences);
    assert!(!report.deprecated_mechanisms.is_valid);
    assert_eq!(report.deprecated_mechanisms.errors.len(), 1);
}

#[test]
fn rules_flag_literal_plus_all() {
    let occurrences = vec![occurrence("example.com", "v=spf1 +all", SpfRecordKind::Initial)];
    let report = validate(&occurrences);
    assert!(!report.unsafe_all_mechanism.is_valid);
    assert_eq!(report.first_all_qualifier, Some(SpfQualifier::Pass));
}

#[test]
fn bare_all_implies_pass_qualifier() {
    let occurrences = vec![occurrence("example.com", "v=spf1 all", SpfRecordKind::Initial)];
    let report = validate(&occurrences);
    // a bare `all` is not the literal `+all` token
    assert!(report.unsafe_all_mechanism.is_valid);
    assert_eq!(report.first_all_qualifier, Some(SpfQualifier::Pass));
}

#[test]
fn first_all_qualifier_is_none_without_all() {
    let occurrences = vec![occurrence(
        "example.com",
        "v=spf1 redirect=other.example",
        SpfRecordKind::Initial,
    )];
    let report = validate(&occurrences);
    assert_eq!(report.first_all_qualifier, None);
}

#[test]
fn first_all_qualifier_follows_resolution_order() {
    let occurrences = vec![
        occurrence("example.com", "v=spf1 include:a.example ~all", SpfRecordKind::Initial),
        occurrence("a.example", "v=spf1 -all", SpfRecordKind::Include),
    ];
    let report = validate(&occurrences);
    assert_eq!(report.first_all_qualifier, Some(SpfQualifier::SoftFail));
}

#[test]
fn chain_over_ten_records_fails_the_limit_check() {
    let mut occurrences = vec![occurrence(
        "example.com",
        "v=spf1 include:a0.example -all",
        SpfRecordKind::Initial,
    )];
    for i in 0..11 {
        occurrences.push(occurrence(
            &format!("a{i}.example"),
            "v=spf1 -all",
            SpfRecordKind::Include,
        ));
    }
    let report = validate(&occurrences);
    assert!(!report.max_ten_spf_records.is_valid);
}

#[test]
fn multiple_initial_records_fail_the_single_record_check() {
    let occurrences = vec![
        occurrence("example.com", "v=spf1 -all", SpfRecordKind::Initial),
        occurrence("example.com", "v=spf1 ~all", SpfRecordKind::Initial),
    ];
    let report = validate(&occurrences);
    assert!(!report.one_initial_spf_record.is_valid);
}

#[test]
fn scoring_is_monotonic_in_the_all_qualifier() {
    let points = |raw: &str| {
        let occurrences = vec![occurrence("example.com", raw, SpfRecordKind::Initial)];
        let scoring = score(&validate(&occurrences));
        scoring
            .items
            .iter()
            .find(|item| item.name == "all_qualifier_policy")
            .expect("qualifier item")
            .score
    };
    let neutral = points("v=spf1 ?all");
    let soft = points("v=spf1 ~all");
    let hard = points("v=spf1 -all");
    assert_eq!((neutral, soft, hard), (0, 3, 5));
}

#[tokio::test]
async fn clean_record_scores_full_marks() {
    let mut stub = StubResolver::new();
    stub.insert_records("example.com", ["v=spf1 ip4:192.0.2.0/24 -all"]);

    let outcome = super::check(&stub, "example.com").await.expect("check");
    assert_eq!(outcome.scoring.total_score, 40);
    assert_eq!(outcome.scoring.max_possible_score, 40);
    assert_eq!(outcome.scoring.percentage, 100);
    assert_eq!(outcome.scoring.grade, Grade::A);
}

#[tokio::test]
async fn missing_record_fails_presence_and_grades_f() {
    let stub = StubResolver::new();
    let outcome = super::check(&stub, "example.com").await.expect("check");
    let present = outcome
        .scoring
        .items
        .iter()
        .find(|item| item.name == "spf_present")
        .expect("presence item");
    assert!(!present.passed);
    // chain-level checks pass vacuously, so only half the weight remains
    assert_eq!(outcome.scoring.total_score, 20);
    assert_eq!(outcome.scoring.grade, Grade::F);
}

proptest! {
    #[test]
    fn syntax_validator_never_panics(raw in "\\PC*") {
        let _ = validate_syntax(&raw);
    }

    #[test]
    fn rule_validator_never_panics(raw in "\\PC*") {
        let occurrences = vec![occurrence("example.com", &raw, SpfRecordKind::Initial)];
        let _ = score(&validate(&occurrences));
    }
}
