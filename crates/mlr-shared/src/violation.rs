//! Violation data model.
//!
//! A `Violation` is the outcome of checking one field against one claim or
//! one rule. Only `violated` outcomes carry a message, and that message always
//! starts with one of the two markers below so a reader can tell claim
//! violations apart from rule violations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Marker for rule violations (character limits).
pub const VIOLATION_PREFIX: &str = "Violated: ";

/// Marker for claim violations.
pub const CLAIM_VIOLATION_PREFIX: &str = "Violated claim: ";

/// Per-field results, keyed by the full field name (pod prefix included).
pub type ClaimResults = BTreeMap<String, Vec<Violation>>;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationStatus {
    #[serde(rename = "valid")]
    Valid,
    #[serde(rename = "violated")]
    Violated,
    #[serde(rename = "n/a")]
    NotApplicable,
}

impl ViolationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationStatus::Valid => "valid",
            ViolationStatus::Violated => "violated",
            ViolationStatus::NotApplicable => "n/a",
        }
    }
}

impl fmt::Display for ViolationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which check produced a violation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Claim,
    Rule,
}

/// Result of checking one field against one claim or rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawViolation")]
pub struct Violation {
    status: ViolationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    violation: Option<String>,
}

impl Violation {
    pub fn valid() -> Self {
        Self {
            status: ViolationStatus::Valid,
            violation: None,
        }
    }

    pub fn not_applicable() -> Self {
        Self {
            status: ViolationStatus::NotApplicable,
            violation: None,
        }
    }

    /// Claim violation; the message echoes the raw claim text.
    pub fn claim_violated(claim_text: &str) -> Self {
        Self {
            status: ViolationStatus::Violated,
            violation: Some(format!("{}{}", CLAIM_VIOLATION_PREFIX, claim_text)),
        }
    }

    /// Rule violation with a human-readable detail.
    pub fn rule_violated(detail: &str) -> Self {
        Self {
            status: ViolationStatus::Violated,
            violation: Some(format!("{}{}", VIOLATION_PREFIX, detail)),
        }
    }

    pub fn status(&self) -> ViolationStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.violation.as_deref()
    }

    pub fn is_violated(&self) -> bool {
        self.status == ViolationStatus::Violated
    }

    pub fn kind(&self) -> Option<ViolationKind> {
        let message = self.violation.as_deref()?;
        if message.starts_with(CLAIM_VIOLATION_PREFIX) {
            Some(ViolationKind::Claim)
        } else if message.starts_with(VIOLATION_PREFIX) {
            Some(ViolationKind::Rule)
        } else {
            None
        }
    }

    /// Claim text to hand to the clipboard for a claim violation.
    pub fn copy_text(&self) -> Option<&str> {
        if self.kind()? != ViolationKind::Claim {
            return None;
        }
        let message = self.violation.as_deref()?;
        message
            .split_once(CLAIM_VIOLATION_PREFIX.trim_end())
            .map(|(_, claim)| claim.trim())
    }
}

/// Message with the rule marker removed, for display.
pub fn remove_violation_prefix(message: &str) -> &str {
    message.strip_prefix(VIOLATION_PREFIX).unwrap_or(message)
}

#[derive(Deserialize)]
struct RawViolation {
    status: ViolationStatus,
    #[serde(default)]
    violation: Option<String>,
}

impl TryFrom<RawViolation> for Violation {
    type Error = String;

    fn try_from(raw: RawViolation) -> Result<Self, Self::Error> {
        match (raw.status, raw.violation) {
            (ViolationStatus::Violated, Some(message)) => {
                if !message.starts_with(CLAIM_VIOLATION_PREFIX)
                    && !message.starts_with(VIOLATION_PREFIX)
                {
                    return Err(format!("violation message lacks a marker: {message}"));
                }
                Ok(Self {
                    status: ViolationStatus::Violated,
                    violation: Some(message),
                })
            }
            (ViolationStatus::Violated, None) => {
                Err("violated status requires a violation message".to_string())
            }
            (status, Some(_)) => Err(format!("{status} status cannot carry a message")),
            (status, None) => Ok(Self {
                status,
                violation: None,
            }),
        }
    }
}

/// Number of `violated` entries across every field.
pub fn count_issues(results: &ClaimResults) -> usize {
    results
        .values()
        .flatten()
        .filter(|v| v.is_violated())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_as_wire_strings() {
        let json = serde_json::to_string(&Violation::not_applicable()).unwrap();
        assert_eq!(json, r#"{"status":"n/a"}"#);
        let json = serde_json::to_string(&Violation::valid()).unwrap();
        assert_eq!(json, r#"{"status":"valid"}"#);
    }

    #[test]
    fn test_claim_violation_message() {
        let v = Violation::claim_violated("Taken once daily.");
        assert_eq!(v.status(), ViolationStatus::Violated);
        assert_eq!(v.message(), Some("Violated claim: Taken once daily."));
        assert_eq!(v.kind(), Some(ViolationKind::Claim));
        assert_eq!(v.copy_text(), Some("Taken once daily."));
    }

    #[test]
    fn test_rule_violation_has_no_copy_text() {
        let v = Violation::rule_violated("Max character limit for body is 300");
        assert_eq!(v.kind(), Some(ViolationKind::Rule));
        assert_eq!(v.copy_text(), None);
        assert_eq!(
            remove_violation_prefix(v.message().unwrap()),
            "Max character limit for body is 300"
        );
    }

    #[test]
    fn test_deserialize_rejects_broken_invariants() {
        assert!(serde_json::from_str::<Violation>(r#"{"status":"violated"}"#).is_err());
        assert!(
            serde_json::from_str::<Violation>(r#"{"status":"valid","violation":"x"}"#).is_err()
        );
        assert!(
            serde_json::from_str::<Violation>(r#"{"status":"violated","violation":"oops"}"#)
                .is_err()
        );
        let ok: Violation =
            serde_json::from_str(r#"{"status":"violated","violation":"Violated: too long"}"#)
                .unwrap();
        assert_eq!(ok.kind(), Some(ViolationKind::Rule));
    }

    #[test]
    fn test_count_issues() {
        let mut results = ClaimResults::new();
        results.insert(
            "header".into(),
            vec![Violation::valid(), Violation::claim_violated("a")],
        );
        results.insert(
            "body".into(),
            vec![Violation::rule_violated("b"), Violation::not_applicable()],
        );
        assert_eq!(count_issues(&results), 2);
    }
}
