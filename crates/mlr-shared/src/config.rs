//! MLR configuration.
//!
//! Optional TOML file, located via `--config`, then `$MLR_CONFIG`. Every
//! section has defaults so an empty or missing file is a valid config.
//!
//! ```toml
//! [limits]
//! header = 60
//! body = 250
//!
//! [poll]
//! max_retries = 5
//! interval_ms = 1000
//!
//! [logging]
//! level = "info"
//!
//! [registry]
//! path = "claims.json"
//! ```

use crate::claims::ClaimRegistry;
use crate::error::{MlrError, Result};
use crate::limits::CharacterLimits;
use crate::poll::PollConfig;
use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "MLR_CONFIG";

/// Polling settings for content that is not ready yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSettings {
    /// Attempts before giving up (valid: 1-100)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between attempts in milliseconds (valid: 100-60000)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_max_retries() -> u32 {
    10
}

fn default_interval_ms() -> u64 {
    2_000
}

impl PollSettings {
    pub fn effective_max_retries(&self) -> u32 {
        self.max_retries.clamp(1, 100)
    }

    pub fn effective_interval_ms(&self) -> u64 {
        self.interval_ms.clamp(100, 60_000)
    }

    pub fn to_poll_config(&self) -> PollConfig {
        PollConfig {
            max_retries: self.effective_max_retries(),
            interval: Duration::from_millis(self.effective_interval_ms()),
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            interval_ms: default_interval_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Where claim libraries come from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// JSON or TOML library file; built-in libraries when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MlrConfig {
    /// Character limits; replaces the default table when present
    #[serde(default)]
    pub limits: Option<BTreeMap<String, usize>>,

    #[serde(default)]
    pub poll: PollSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub registry: RegistrySettings,

    /// Directory of the file this config was read from
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl MlrConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MlrConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MlrError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Explicit path, then `$MLR_CONFIG`, then defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load_from(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    fn check(&self) -> Result<()> {
        if let Some(limits) = &self.limits {
            if let Some((field, _)) = limits.iter().find(|(_, max)| **max == 0) {
                return Err(MlrError::Config(format!(
                    "limit for '{}' must be greater than zero",
                    field
                )));
            }
        }
        if self.poll.max_retries != self.poll.effective_max_retries() {
            warn!(
                "poll.max_retries {} out of range, using {}",
                self.poll.max_retries,
                self.poll.effective_max_retries()
            );
        }
        Ok(())
    }

    pub fn character_limits(&self) -> CharacterLimits {
        match &self.limits {
            Some(limits) => CharacterLimits::new(limits.clone()),
            None => CharacterLimits::default(),
        }
    }

    /// Registry path resolved against the config file's directory.
    pub fn registry_path(&self) -> Option<PathBuf> {
        let path = self.registry.path.as_ref()?;
        match (&self.base_dir, path.is_relative()) {
            (Some(base), true) => Some(base.join(path)),
            _ => Some(path.clone()),
        }
    }

    pub fn claim_registry(&self) -> Result<ClaimRegistry> {
        match self.registry_path() {
            Some(path) => ClaimRegistry::from_path(&path),
            None => Ok(ClaimRegistry::builtin()),
        }
    }

    pub fn validator(&self) -> Result<Validator> {
        Ok(Validator::new(self.claim_registry()?, self.character_limits()))
    }
}
