//! App configuration stored in `agent.toml`.
//!
//! One file carries the `[agent]` section plus the `[repo]` / `[smtp]`
//! sections owned by the skills crate. Secrets are overlaid from the
//! environment afterwards.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use skills::config::SkillsConfig;

use crate::definitions::AgentSettings;

pub const DEFAULT_CONFIG_PATH: &str = "agent.toml";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub agent: AgentSettings,
    pub skills: SkillsConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AgentSection {
    agent: AgentSettings,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        self.skills.validate()
    }

    /// Overlay `REPO_*` / `SMTP_*` variables from `lookup`.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.skills = self.skills.apply_env(lookup)?;
        Ok(self)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AppConfig::default()`.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        let cfg = AppConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let section: AgentSection =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    let skills =
        SkillsConfig::from_toml(&contents).with_context(|| format!("parse {}", path.display()))?;
    let cfg = AppConfig {
        agent: section.agent,
        skills,
    };
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}
