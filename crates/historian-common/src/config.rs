//! Aegis Historian Config - Configuration Structures
//!
//! Configuration for the rollup engine and its batch report driver. Supports
//! loading from TOML files and programmatic construction with sensible
//! defaults.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use crate::error::{HistorianError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// State Duration Configuration
// =============================================================================

/// How the state duration generator counts occurrences of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StartsMode {
    /// Every accepted sample counts as an occurrence of its value.
    #[default]
    EverySample,
    /// Only a transition into a value counts (legacy "starts" reporting).
    OnChange,
}

/// Configuration for state duration rollups.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StateConfig {
    pub starts_mode: StartsMode,
}

// =============================================================================
// Report Configuration
// =============================================================================

/// Configuration for batch report execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub parallel: bool,
    pub workers: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            workers: num_cpus::get(),
        }
    }
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Top-level rollup engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub state: StateConfig,
    pub report: ReportConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded engine configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| HistorianError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| HistorianError::Serialization(e.to_string()))
    }

    /// Create configuration with development defaults.
    pub fn development() -> Self {
        Self::default()
    }

    /// Configuration reproducing legacy reports, which count a state start
    /// only on a value change.
    pub fn legacy() -> Self {
        Self {
            state: StateConfig {
                starts_mode: StartsMode::OnChange,
            },
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.report.parallel && self.report.workers == 0 {
            return Err(HistorianError::Configuration(
                "report.workers must be at least 1 when report.parallel is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.state.starts_mode, StartsMode::EverySample);
        assert!(config.report.parallel);
        assert!(config.report.workers >= 1);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = EngineConfig::from_toml(
            r#"
            [state]
            starts_mode = "on_change"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.state.starts_mode, StartsMode::OnChange);
        assert!(config.report.parallel);
    }

    #[test]
    fn test_from_toml_rejects_zero_workers() {
        let err = EngineConfig::from_toml(
            r#"
            [report]
            parallel = true
            workers = 0
            "#,
        )
        .expect_err("zero workers should be rejected");
        assert!(matches!(err, HistorianError::Configuration(_)));
    }

    #[test]
    fn test_from_toml_rejects_unknown_mode() {
        let err = EngineConfig::from_toml("[state]\nstarts_mode = \"sometimes\"\n")
            .expect_err("unknown mode should be rejected");
        assert!(err.is_user_error());
    }

    #[test]
    fn test_toml_round_trip() {
        let legacy = EngineConfig::legacy();
        let text = legacy.to_toml().expect("serialize");
        let parsed = EngineConfig::from_toml(&text).expect("parse");
        assert_eq!(parsed.state.starts_mode, StartsMode::OnChange);
        assert_eq!(parsed.report.workers, legacy.report.workers);
    }
}
