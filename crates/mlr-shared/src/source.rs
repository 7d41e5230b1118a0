//! Content sources.
//!
//! `ExperienceSource` is the seam where the host application plugs in.
//! An empty list means "not ready yet", which the poll loop retries.

use crate::error::{MlrError, Result};
use crate::experience::Experience;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

pub trait ExperienceSource {
    fn fetch_experiences(&self) -> Result<Vec<Experience>>;
}

/// Fixed set of experiences.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    experiences: Vec<Experience>,
}

impl StaticSource {
    pub fn new(experiences: Vec<Experience>) -> Self {
        Self { experiences }
    }
}

impl ExperienceSource for StaticSource {
    fn fetch_experiences(&self) -> Result<Vec<Experience>> {
        Ok(self.experiences.clone())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExperiencesFile {
    Wrapped { experiences: Vec<Experience> },
    Bare(Vec<Experience>),
}

/// Experiences exported to a JSON file, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ExperienceSource for JsonFileSource {
    fn fetch_experiences(&self) -> Result<Vec<Experience>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: ExperiencesFile = serde_json::from_str(&content).map_err(|e| {
            MlrError::Source(format!("{}: {}", self.path.display(), e))
        })?;

        Ok(match parsed {
            ExperiencesFile::Wrapped { experiences } => experiences,
            ExperiencesFile::Bare(experiences) => experiences,
        })
    }
}
