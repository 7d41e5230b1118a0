//! Results grouping for display.
//!
//! Turns flat `ClaimResults` into pod sections with per-field issue counts
//! and the summary banner shown above them.

use crate::pods::{extract_pod_number, remove_pod_prefix, snake_to_capitalized, UNPODDED};
use crate::violation::{ClaimResults, Violation};
use serde::Serialize;
use std::collections::BTreeMap;

/// One field's results within a pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    /// Field name with the pod prefix
    pub field_name: String,
    /// Prefix-free name, capitalized (`PreHeader`)
    pub display_name: String,
    pub issue_count: usize,
    pub violations: Vec<Violation>,
}

impl FieldSummary {
    /// Badge text: `No issues`, `1 issue`, `3 issues`.
    pub fn badge(&self) -> String {
        match self.issue_count {
            0 => "No issues".to_string(),
            1 => "1 issue".to_string(),
            n => format!("{} issues", n),
        }
    }

    /// Only the entries worth listing.
    pub fn issues(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.is_violated() && v.message().is_some())
    }
}

/// Fields sharing a pod prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodGroup {
    pub pod: u32,
    pub fields: Vec<FieldSummary>,
}

impl PodGroup {
    /// `Section <N>`, or nothing for unprefixed fields.
    pub fn heading(&self) -> Option<String> {
        (self.pod != UNPODDED).then(|| format!("Section {}", self.pod))
    }
}

/// Grouped results plus the banner for one experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsReport {
    /// 1-based experience number as shown to the user
    pub experience_number: usize,
    pub total_issues: usize,
    pub banner: String,
    pub pods: Vec<PodGroup>,
}

impl ResultsReport {
    pub fn has_issues(&self) -> bool {
        self.total_issues > 0
    }
}

/// Group results by pod number; fields keep result-key order within a pod.
pub fn group_by_pod(results: &ClaimResults) -> Vec<PodGroup> {
    let mut pods: BTreeMap<u32, Vec<FieldSummary>> = BTreeMap::new();

    for (field_name, violations) in results {
        let pod = extract_pod_number(field_name);
        let summary = FieldSummary {
            field_name: field_name.clone(),
            display_name: snake_to_capitalized(remove_pod_prefix(field_name)),
            issue_count: violations.iter().filter(|v| v.is_violated()).count(),
            violations: violations.clone(),
        };
        pods.entry(pod).or_default().push(summary);
    }

    pods.into_iter()
        .map(|(pod, fields)| PodGroup { pod, fields })
        .collect()
}

/// Build the report for the experience at `experience_index` (0-based).
pub fn build_report(results: &ClaimResults, experience_index: usize) -> ResultsReport {
    let pods = group_by_pod(results);
    let total_issues = pods
        .iter()
        .flat_map(|pod| pod.fields.iter())
        .map(|field| field.issue_count)
        .sum();
    let experience_number = experience_index + 1;

    ResultsReport {
        experience_number,
        total_issues,
        banner: banner_message(total_issues, experience_number),
        pods,
    }
}

/// `No issues on Email 1` / `Three issues need attention on Email 2`.
pub fn banner_message(total_issues: usize, experience_number: usize) -> String {
    if total_issues == 0 {
        return format!("No issues on Email {}", experience_number);
    }
    let (noun, verb) = if total_issues == 1 {
        ("issue", "needs")
    } else {
        ("issues", "need")
    };
    format!(
        "{} {} {} attention on Email {}",
        number_to_words(total_issues as u64),
        noun,
        verb,
        experience_number
    )
}

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 6] = [
    (1_000_000_000_000_000_000, "quintillion"),
    (1_000_000_000_000_000, "quadrillion"),
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

fn below_thousand(n: u64, out: &mut Vec<String>) {
    let hundreds = n / 100;
    let rest = n % 100;
    if hundreds > 0 {
        out.push(ONES[hundreds as usize].to_string());
        out.push("hundred".to_string());
    }
    if rest == 0 {
        return;
    }
    if rest < 20 {
        out.push(ONES[rest as usize].to_string());
    } else if rest % 10 == 0 {
        out.push(TENS[(rest / 10) as usize].to_string());
    } else {
        out.push(format!(
            "{}-{}",
            TENS[(rest / 10) as usize],
            ONES[(rest % 10) as usize]
        ));
    }
}

/// Spell out a count in capitalized words: `21` -> `Twenty-one`,
/// `1500` -> `One Thousand, Five Hundred`, `2000` -> `Two Thousand`.
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return capitalize(ONES[0]);
    }

    let mut words = Vec::new();
    let mut remaining = n;
    for (scale, name) in SCALES {
        if remaining >= scale {
            below_thousand(remaining / scale, &mut words);
            remaining %= scale;
            // Scale groups are comma-separated when more words follow.
            if remaining > 0 {
                words.push(format!("{},", name));
            } else {
                words.push(name.to_string());
            }
        }
    }
    below_thousand(remaining, &mut words);

    words
        .iter()
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
