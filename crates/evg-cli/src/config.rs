//! CLI configuration from environment and JSON files.

use anyhow::{Context, Result};
use evg_core::PlannerConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// JSON planner configuration (`EVG_CONFIG`)
    pub planner_config: Option<PathBuf>,
    /// Emit JSON log lines (`EVG_LOG_FORMAT=json`)
    pub log_json: bool,
    /// Default safety margin override (`EVG_SAFETY_MARGIN`)
    pub safety_margin: Option<f64>,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self {
            planner_config: env::var("EVG_CONFIG").ok().map(PathBuf::from),
            log_json: env::var("EVG_LOG_FORMAT")
                .map(|s| s.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            safety_margin: env::var("EVG_SAFETY_MARGIN")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Planner configuration from `explicit`, else `EVG_CONFIG`, else defaults.
    pub fn planner_config(&self, explicit: Option<&Path>) -> Result<PlannerConfig> {
        let mut config = load_planner_config(explicit.or(self.planner_config.as_deref()))?;
        if let Some(margin) = self.safety_margin {
            config.safety_margin = margin;
        }
        Ok(config)
    }
}

/// Read a JSON planner configuration; missing fields take their defaults.
pub fn load_planner_config(path: Option<&Path>) -> Result<PlannerConfig> {
    let Some(path) = path else {
        return Ok(PlannerConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading planner config {}", path.display()))?;
    let config: PlannerConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing planner config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating planner config {}", path.display()))?;
    Ok(config)
}
