//! Error types for the MLR claims tooling.
//!
//! The validator itself never fails; these cover the collaborators around it
//! (config files, registry files, content sources, polling).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MlrError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Claim registry error: {0}")]
    Registry(String),

    #[error("Content source error: {0}")]
    Source(String),

    #[error("Content not ready after {attempts} attempts")]
    PollExhausted { attempts: u32 },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl MlrError {
    pub fn code(&self) -> i32 {
        match self {
            MlrError::Config(_) => -32010,
            MlrError::Registry(_) => -32011,
            MlrError::Source(_) => -32012,
            MlrError::PollExhausted { .. } => -32013,
            MlrError::Cancelled => -32014,
            MlrError::Io(_) => -32006,
            MlrError::Json(_) => -32700,
            MlrError::Toml(_) => -32701,
        }
    }
}

pub type Result<T> = std::result::Result<T, MlrError>;
