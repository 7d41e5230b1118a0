//! Claim libraries and the registry that serves them.
//!
//! The registry ships with the four demo libraries used by the MLR panel.
//! It can be replaced wholesale by a JSON or TOML file so the validator
//! never depends on hardcoded reference data.

use crate::error::{MlrError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A regulatory statement that content is checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub description: String,
}

impl Claim {
    pub fn new(id: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
        }
    }
}

/// A named collection of claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimLibrary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub claims: Vec<Claim>,
}

/// Payload shape returned by the claims-finder action: `{ "claims": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsPayload {
    pub claims: Vec<ClaimLibrary>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonRegistryFile {
    Payload(ClaimsPayload),
    Bare(Vec<ClaimLibrary>),
}

#[derive(Deserialize)]
struct TomlRegistryFile {
    #[serde(default)]
    libraries: Vec<ClaimLibrary>,
}

/// Ordered set of claim libraries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRegistry {
    libraries: Vec<ClaimLibrary>,
}

impl ClaimRegistry {
    /// Build a registry, rejecting duplicate library ids.
    pub fn new(libraries: Vec<ClaimLibrary>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for library in &libraries {
            if !seen.insert(library.id.as_str()) {
                return Err(MlrError::Registry(format!(
                    "duplicate library id '{}'",
                    library.id
                )));
            }
        }
        Ok(Self { libraries })
    }

    /// The built-in demo libraries.
    pub fn builtin() -> Self {
        Self {
            libraries: builtin_libraries(),
        }
    }

    /// Load a registry file. `.toml` files use `[[libraries]]` tables,
    /// anything else is parsed as JSON (payload object or bare array).
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let libraries = if is_toml {
            toml::from_str::<TomlRegistryFile>(&content)?.libraries
        } else {
            match serde_json::from_str::<JsonRegistryFile>(&content)? {
                JsonRegistryFile::Payload(payload) => payload.claims,
                JsonRegistryFile::Bare(libraries) => libraries,
            }
        };

        info!(
            "Loaded {} claim libraries from {}",
            libraries.len(),
            path.display()
        );
        Self::new(libraries)
    }

    pub fn get(&self, id: &str) -> Option<&ClaimLibrary> {
        self.libraries.iter().find(|library| library.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClaimLibrary> {
        self.libraries.iter()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Claims of every selected library, in registry order.
    ///
    /// Unknown ids contribute nothing.
    pub fn resolve<S: AsRef<str>>(&self, selected: &[S]) -> Vec<&Claim> {
        let wanted: BTreeSet<&str> = selected.iter().map(AsRef::as_ref).collect();
        let claims: Vec<&Claim> = self
            .libraries
            .iter()
            .filter(|library| wanted.contains(library.id.as_str()))
            .flat_map(|library| library.claims.iter())
            .collect();

        if claims.is_empty() && !wanted.is_empty() {
            debug!("No claims resolved for selection {:?}", wanted);
        }
        claims
    }

    /// Claims-finder payload for this registry.
    pub fn to_payload(&self) -> ClaimsPayload {
        ClaimsPayload {
            claims: self.libraries.clone(),
        }
    }
}

impl Default for ClaimRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn library(id: &str, name: &str, claims: &[(&str, &str)]) -> ClaimLibrary {
    ClaimLibrary {
        id: id.to_string(),
        name: name.to_string(),
        claims: claims
            .iter()
            .map(|(id, description)| Claim::new(id, description))
            .collect(),
    }
}

fn builtin_libraries() -> Vec<ClaimLibrary> {
    vec![
        library(
            "efficacy-claims",
            "Efficacy Claims",
            &[
                (
                    "claim1",
                    "Clinically proven to reduce joint inflammation by up to 50%.",
                ),
                (
                    "claim2",
                    "Alleviates chronic pain associated with Chronexa within 2 weeks.",
                ),
                (
                    "claim3",
                    "Demonstrates a 60% improvement in joint mobility over 6 months.",
                ),
            ],
        ),
        library(
            "safety-claims",
            "Safety and Tolerability Claims",
            &[
                (
                    "claim4",
                    "Demonstrated a favorable safety profile with over 95% adherence in trials.",
                ),
                (
                    "claim5",
                    "No significant interactions with common NSAIDs and corticosteroids.",
                ),
                ("claim6", "Approved for patients aged 16 to 80 years."),
            ],
        ),
        library(
            "dosage-claims",
            "Dosage and Administration Claims",
            &[
                ("claim7", "Taken once daily for consistent symptom control."),
                ("claim8", "Available in 100 mg and 200 mg tablet forms."),
                (
                    "claim9",
                    "Can be taken with or without food for patient convenience.",
                ),
            ],
        ),
        library(
            "side-effects-claims",
            "Side Effects Claims",
            &[
                (
                    "claim10",
                    "Most common side effect is mild fatigue, reported in fewer than 8% of patients.",
                ),
                ("claim11", "No significant impact on cardiovascular health."),
                (
                    "claim12",
                    "Mild headaches reported in less than 3% of patients, typically resolving within a week.",
                ),
            ],
        ),
    ]
}
