//! Claim matching.
//!
//! Substring containment after normalization. When exact containment fails
//! but the digit-free forms still match, the copy kept the claim's wording and
//! changed its numbers, which is flagged as a violation.

use crate::violation::Violation;

/// Punctuation dropped during normalization.
const STRIPPED_PUNCTUATION: [char; 6] = [',', '.', '!', '?', ';', ':'];

/// Lowercase, collapse whitespace, trim, drop `, . ! ? ; :`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect()
}

fn strip_digits(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Check one field's text against one claim.
pub fn check_claim(field_text: &str, claim_text: &str) -> Violation {
    let field = normalize(field_text);
    let claim = normalize(claim_text);

    if field.contains(&claim) {
        return Violation::valid();
    }

    if strip_digits(&field).contains(&strip_digits(&claim)) {
        return Violation::claim_violated(claim_text);
    }

    Violation::not_applicable()
}
