use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::assigner::AssignConfig;
use crate::dummy::ID_FIELD;
use crate::verify::VerifyConfig;

/// Everything one run needs, passed explicitly into each stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Input column holding the item identifier
    pub id_field: String,
    /// Fixed seed for a reproducible run; drawn from entropy when unset
    pub seed: Option<u64>,
    pub assign: AssignConfig,
    pub verify: VerifyConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            id_field: ID_FIELD.to_string(),
            seed: None,
            assign: AssignConfig::default(),
            verify: VerifyConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load from a JSON file; missing keys take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        config.assign.validate()?;
        Ok(config)
    }

    /// Defaults, or the file at `path` when given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
