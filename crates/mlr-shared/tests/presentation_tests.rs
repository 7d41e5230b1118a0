//! Tests for results grouping and the summary banner.

use mlr_shared::presentation::{build_report, group_by_pod};
use mlr_shared::violation::{ClaimResults, Violation};

fn sample_results() -> ClaimResults {
    let mut results = ClaimResults::new();
    results.insert(
        "header".into(),
        vec![Violation::valid(), Violation::not_applicable()],
    );
    results.insert(
        "pod1_body".into(),
        vec![
            Violation::claim_violated("Taken once daily for consistent symptom control."),
            Violation::rule_violated("Max character limit for pod1_body is 300"),
        ],
    );
    results.insert(
        "pod1_pre_header".into(),
        vec![Violation::not_applicable(), Violation::not_applicable()],
    );
    results.insert(
        "pod10_header".into(),
        vec![Violation::claim_violated("Approved for patients aged 16 to 80 years.")],
    );
    results.insert("pod2_header".into(), vec![Violation::valid()]);
    results
}

#[test]
fn test_group_by_pod_orders_numerically() {
    let pods = group_by_pod(&sample_results());
    let numbers: Vec<u32> = pods.iter().map(|p| p.pod).collect();
    assert_eq!(numbers, [0, 1, 2, 10]);
}

#[test]
fn test_group_strips_prefix_and_capitalizes() {
    let pods = group_by_pod(&sample_results());
    let pod1 = &pods[1];
    let names: Vec<&str> = pod1.fields.iter().map(|f| f.display_name.as_str()).collect();
    assert_eq!(names, ["Body", "PreHeader"]);
    assert_eq!(pod1.fields[0].field_name, "pod1_body");
    assert_eq!(pod1.fields[0].issue_count, 2);
    assert_eq!(pod1.fields[0].badge(), "2 issues");
    assert_eq!(pod1.fields[1].badge(), "No issues");
    assert_eq!(pod1.heading().as_deref(), Some("Section 1"));
    assert_eq!(pods[0].heading(), None);
}

#[test]
fn test_report_totals_and_banner() {
    let report = build_report(&sample_results(), 1);
    assert_eq!(report.experience_number, 2);
    assert_eq!(report.total_issues, 3);
    assert!(report.has_issues());
    assert_eq!(report.banner, "Three issues need attention on Email 2");
}

#[test]
fn test_empty_report() {
    let report = build_report(&ClaimResults::new(), 0);
    assert_eq!(report.total_issues, 0);
    assert!(report.pods.is_empty());
    assert_eq!(report.banner, "No issues on Email 1");
}

#[test]
fn test_listed_issues_and_copy_text() {
    let pods = group_by_pod(&sample_results());
    let body = &pods[1].fields[0];
    let copy: Vec<Option<&str>> = body.issues().map(|v| v.copy_text()).collect();
    assert_eq!(
        copy,
        [Some("Taken once daily for consistent symptom control."), None]
    );
}
