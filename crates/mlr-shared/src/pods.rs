//! Pod prefix helpers.
//!
//! Repeated content blocks carry field names like `pod2_header`. The prefix
//! groups results; the remainder is the field's type.

use once_cell::sync::Lazy;
use regex::Regex;

pub const POD_PREFIX: &str = "pod";

/// Pod number used for fields without a prefix.
pub const UNPODDED: u32 = 0;

static POD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{}(\d+)_", POD_PREFIX)).expect("pod prefix regex is valid")
});

/// Pod number of a field name, `0` when there is no prefix.
pub fn extract_pod_number(field_name: &str) -> u32 {
    POD_RE
        .captures(field_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(UNPODDED)
}

/// Field name with any `pod<N>_` prefix removed.
pub fn remove_pod_prefix(field_name: &str) -> &str {
    match POD_RE.find(field_name) {
        Some(m) => &field_name[m.end()..],
        None => field_name,
    }
}

/// `pre_header` -> `PreHeader`.
pub fn snake_to_capitalized(name: &str) -> String {
    name.split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
