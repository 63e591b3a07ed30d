use anyhow::{Context, Result};
use logistic_core::DashboardConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl ServerConfig {
    /// Reads `path` when given, otherwise returns the defaults.
    /// A file that cannot be read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            info!("no config file given, using defaults");
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: ServerConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.dashboard
            .grid
            .validate()
            .context("Invalid [dashboard.grid]")?;
        self.dashboard
            .solver
            .validate()
            .context("Invalid [dashboard.solver]")?;
        Ok(())
    }
}
