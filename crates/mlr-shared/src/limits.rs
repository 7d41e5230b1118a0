//! Character-limit rule.
//!
//! Limits are keyed by the base field name, so `pod2_header` is held to the
//! `header` ceiling. Fields without an entry are not checked.

use crate::pods::remove_pod_prefix;
use crate::violation::Violation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base field name -> maximum character count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterLimits {
    limits: BTreeMap<String, usize>,
}

impl CharacterLimits {
    pub fn new(limits: BTreeMap<String, usize>) -> Self {
        Self { limits }
    }

    /// Table with no ceilings at all.
    pub fn empty() -> Self {
        Self {
            limits: BTreeMap::new(),
        }
    }

    pub fn with_limit(mut self, field: &str, max_chars: usize) -> Self {
        self.limits.insert(field.to_string(), max_chars);
        self
    }

    /// Limit for a field name, pod prefix ignored.
    pub fn limit_for(&self, field_name: &str) -> Option<usize> {
        self.limits.get(remove_pod_prefix(field_name)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.limits.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Check a field value against its ceiling.
    ///
    /// Length is counted in characters, not bytes. Staying under the limit is
    /// reported as `n/a`, not `valid`.
    pub fn check(&self, field_name: &str, field_text: &str) -> Violation {
        let Some(limit) = self.limit_for(field_name) else {
            return Violation::not_applicable();
        };

        if field_text.chars().count() > limit {
            Violation::rule_violated(&format!(
                "Max character limit for {} is {}",
                field_name, limit
            ))
        } else {
            Violation::not_applicable()
        }
    }
}

impl Default for CharacterLimits {
    fn default() -> Self {
        Self::empty()
            .with_limit("header", 80)
            .with_limit("pre_header", 100)
            .with_limit("body", 300)
    }
}

/// Check against the default limit table.
pub fn check_character_limit(field_name: &str, field_text: &str) -> Violation {
    CharacterLimits::default().check(field_name, field_text)
}
