//! Skill configuration: TOML file overlaid with environment variables.
//!
//! Secrets (repository token, SMTP password) are expected to come from the
//! environment. Each skill resolves its section once, up front, and refuses
//! to run when required fields are missing.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::email::EmailError;
use crate::repo::RepoReadError;

pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Configuration shared by all skills.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SkillsConfig {
    pub repo: RepoSettings,
    pub smtp: SmtpSettings,
}

/// `[repo]` section used by the repository reader.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RepoSettings {
    /// Host the repository URL must belong to (e.g. `github.com`).
    pub provider: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,

    /// Wall-clock budget for `git clone`.
    pub clone_timeout_secs: u64,

    /// Wall-clock budget for packing the checkout with repomix.
    pub pack_timeout_secs: u64,

    /// Truncate captured process output beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for RepoSettings {
    fn default() -> Self {
        Self {
            provider: None,
            username: None,
            token: None,
            clone_timeout_secs: 5 * 60,
            pack_timeout_secs: 5 * 60,
            output_limit_bytes: 20_000_000,
        }
    }
}

impl fmt::Debug for RepoSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoSettings")
            .field("provider", &self.provider)
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("clone_timeout_secs", &self.clone_timeout_secs)
            .field("pack_timeout_secs", &self.pack_timeout_secs)
            .field("output_limit_bytes", &self.output_limit_bytes)
            .finish()
    }
}

/// `[smtp]` section used by the email sender.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Sender address; falls back to `user`.
    pub from: Option<String>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_SMTP_PORT,
            user: None,
            password: None,
            from: None,
        }
    }
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("from", &self.from)
            .finish()
    }
}

/// Fully resolved repository reader configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct RepoConfig {
    pub provider: String,
    pub username: String,
    pub token: String,
    pub clone_timeout: Duration,
    pub pack_timeout: Duration,
    pub output_limit_bytes: usize,
}

impl fmt::Debug for RepoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoConfig")
            .field("provider", &self.provider)
            .field("username", &self.username)
            .field("token", &"***")
            .field("clone_timeout", &self.clone_timeout)
            .field("pack_timeout", &self.pack_timeout)
            .field("output_limit_bytes", &self.output_limit_bytes)
            .finish()
    }
}

/// Fully resolved SMTP configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("from", &self.from)
            .finish()
    }
}

impl SkillsConfig {
    /// Parse the `[repo]` / `[smtp]` sections of a TOML document and validate.
    ///
    /// Unknown sections (owned by other crates) are ignored.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: SkillsConfig = toml::from_str(contents).context("parse skills config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.repo.clone_timeout_secs == 0 {
            return Err(anyhow!("repo.clone_timeout_secs must be > 0"));
        }
        if self.repo.pack_timeout_secs == 0 {
            return Err(anyhow!("repo.pack_timeout_secs must be > 0"));
        }
        if self.repo.output_limit_bytes == 0 {
            return Err(anyhow!("repo.output_limit_bytes must be > 0"));
        }
        if self.smtp.port == 0 {
            return Err(anyhow!("smtp.port must be > 0"));
        }
        Ok(())
    }

    /// Overlay environment variables on top of file values.
    ///
    /// `lookup` is usually `|key| std::env::var(key).ok()`; tests pass a map.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = var("REPO_PROVIDER") {
            self.repo.provider = Some(value);
        }
        if let Some(value) = var("REPO_USERNAME") {
            self.repo.username = Some(value);
        }
        if let Some(value) = var("REPO_TOKEN") {
            self.repo.token = Some(value);
        }
        if let Some(value) = var("SMTP_HOST") {
            self.smtp.host = Some(value);
        }
        if let Some(value) = var("SMTP_PORT") {
            self.smtp.port = value
                .trim()
                .parse()
                .with_context(|| format!("parse SMTP_PORT '{value}'"))?;
        }
        if let Some(value) = var("SMTP_USER") {
            self.smtp.user = Some(value);
        }
        if let Some(value) = var("SMTP_PASSWORD") {
            self.smtp.password = Some(value);
        }
        if let Some(value) = var("SMTP_FROM") {
            self.smtp.from = Some(value);
        }
        self.validate()?;
        Ok(self)
    }
}

impl RepoSettings {
    /// Resolve into a [`RepoConfig`], listing every missing field at once.
    pub fn resolve(&self) -> Result<RepoConfig, RepoReadError> {
        let mut missing = Vec::new();
        let provider = required(&self.provider, "REPO_PROVIDER", &mut missing);
        let username = required(&self.username, "REPO_USERNAME", &mut missing);
        let token = required(&self.token, "REPO_TOKEN", &mut missing);
        match (provider, username, token) {
            (Some(provider), Some(username), Some(token)) => Ok(RepoConfig {
                provider,
                username,
                token,
                clone_timeout: Duration::from_secs(self.clone_timeout_secs),
                pack_timeout: Duration::from_secs(self.pack_timeout_secs),
                output_limit_bytes: self.output_limit_bytes,
            }),
            _ => Err(RepoReadError::MissingConfig(missing.join(", "))),
        }
    }
}

impl SmtpSettings {
    /// Resolve into an [`SmtpConfig`], listing every missing field at once.
    pub fn resolve(&self) -> Result<SmtpConfig, EmailError> {
        let mut missing = Vec::new();
        let host = required(&self.host, "SMTP_HOST", &mut missing);
        let user = required(&self.user, "SMTP_USER", &mut missing);
        let password = required(&self.password, "SMTP_PASSWORD", &mut missing);
        match (host, user, password) {
            (Some(host), Some(user), Some(password)) => {
                let from = self
                    .from
                    .as_deref()
                    .map(str::trim)
                    .filter(|from| !from.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| user.clone());
                Ok(SmtpConfig {
                    host,
                    port: self.port,
                    user,
                    password,
                    from,
                })
            }
            _ => Err(EmailError::MissingConfig(missing.join(", "))),
        }
    }
}

fn required(value: &Option<String>, name: &str, missing: &mut Vec<String>) -> Option<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            missing.push(name.to_string());
            None
        }
    }
}
