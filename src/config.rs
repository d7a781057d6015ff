use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::core::EngineConfig;
use crate::solar::SolarConfig;

/// Top-level configuration file: engine settings plus the scene description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub solar: SolarConfig,
}

impl AppConfig {
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).context("failed to parse configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_ron_str(&source)
            .with_context(|| format!("in configuration file {}", path.display()))?;
        tracing::info!(path = %path.display(), planets = config.solar.planets.len(), "configuration loaded");
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("failed to serialize configuration")
    }
}
