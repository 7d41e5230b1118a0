//! Claims validation over a whole experience.
//!
//! For every string field: one entry per resolved claim (library order), then
//! one entry for the character-limit rule. Non-string fields get no entry.
//! Validation never fails; missing or malformed input yields empty results.

use crate::claims::{Claim, ClaimRegistry};
use crate::experience::{fields_from_value, ExperienceFields};
use crate::limits::CharacterLimits;
use crate::matching::check_claim;
use crate::violation::{ClaimResults, Violation};
use serde_json::Value;
use tracing::debug;

/// Validator bound to a registry and a limit table.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    registry: ClaimRegistry,
    limits: CharacterLimits,
}

impl Validator {
    pub fn new(registry: ClaimRegistry, limits: CharacterLimits) -> Self {
        Self { registry, limits }
    }

    pub fn registry(&self) -> &ClaimRegistry {
        &self.registry
    }

    pub fn limits(&self) -> &CharacterLimits {
        &self.limits
    }

    pub fn validate<S: AsRef<str>>(
        &self,
        fields: Option<&ExperienceFields>,
        selected_library_ids: &[S],
    ) -> ClaimResults {
        let Some(fields) = fields else {
            return ClaimResults::new();
        };
        let claims = self.registry.resolve(selected_library_ids);
        let results = validate_fields(fields, &claims, &self.limits);
        debug!(
            "Validated {} fields against {} claims",
            results.len(),
            claims.len()
        );
        results
    }

    /// Validate a raw JSON field mapping as received from the host.
    pub fn validate_value<S: AsRef<str>>(
        &self,
        fields: &Value,
        selected_library_ids: &[S],
    ) -> ClaimResults {
        match fields_from_value(fields) {
            Some(fields) => self.validate(Some(&fields), selected_library_ids),
            None => {
                debug!("Field mapping is not an object, returning empty results");
                ClaimResults::new()
            }
        }
    }
}

/// Core loop: claims first, length rule last.
pub fn validate_fields(
    fields: &ExperienceFields,
    claims: &[&Claim],
    limits: &CharacterLimits,
) -> ClaimResults {
    let mut results = ClaimResults::new();

    for (field_name, field) in fields {
        let Some(text) = field.as_text() else {
            continue;
        };

        let mut entries: Vec<Violation> = Vec::with_capacity(claims.len() + 1);
        for claim in claims {
            entries.push(check_claim(text, &claim.description));
        }
        entries.push(limits.check(field_name, text));

        results.insert(field_name.clone(), entries);
    }

    results
}

/// Validate against the built-in registry and default limits.
pub fn validate_claims<S: AsRef<str>>(
    fields: Option<&ExperienceFields>,
    selected_library_ids: &[S],
) -> ClaimResults {
    Validator::default().validate(fields, selected_library_ids)
}
