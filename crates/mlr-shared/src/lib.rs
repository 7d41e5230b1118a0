//! Shared types and logic for MLR claims checking.
//!
//! The core is `validation::validate_claims`: a pure function from an
//! experience's fields and a library selection to per-field results. The
//! other modules supply its inputs (registry, limits, config, sources,
//! session state) and shape its output for display.

pub mod claims;
pub mod config;
pub mod error;
pub mod experience;
pub mod limits;
pub mod matching;
pub mod pods;
pub mod poll;
pub mod presentation;
pub mod session;
pub mod source;
pub mod validation;
pub mod violation;

pub use claims::{Claim, ClaimLibrary, ClaimRegistry};
pub use error::{MlrError, Result};
pub use experience::{Experience, ExperienceField, ExperienceFields};
pub use limits::{check_character_limit, CharacterLimits};
pub use matching::check_claim;
pub use validation::{validate_claims, Validator};
pub use violation::{ClaimResults, Violation, ViolationStatus};
