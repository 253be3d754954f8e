//! Repository reader: clone a branch into a scratch directory and pack it
//! into a single text blob with `repomix`.
//!
//! Both steps are plain subprocess calls (`git`, `npx`). Every failure mode
//! is reported as a [`RepoReadError`] so callers handle one type.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::config::RepoConfig;
use crate::process::{CommandOutput, CommandRunner, SystemRunner, describe, is_missing_executable};

/// Number of trailing clone output lines kept in error messages.
const CLONE_ERROR_TAIL_LINES: usize = 5;

#[derive(Debug, Error)]
pub enum RepoReadError {
    #[error("missing repository configuration: {0}")]
    MissingConfig(String),

    #[error("repository url '{url}' does not belong to provider '{provider}'")]
    ProviderMismatch { url: String, provider: String },

    #[error("failed to clone repository '{url}': {output}")]
    CloneFailed { url: String, output: String },

    #[error("repomix failed: {stderr}")]
    PackFailed { stderr: String },

    #[error("`{tool}` is not available in this environment")]
    MissingTool { tool: String },

    #[error("{stage} timed out after {timeout:?}")]
    Timeout { stage: String, timeout: Duration },

    #[error("unexpected error while reading repository '{url}'")]
    Unexpected {
        url: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Normalized repository location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    /// URL as given, minus a trailing `.git`.
    pub url: String,
    /// `host/owner/name` without scheme or `.git`.
    pub base: String,
}

impl RepoLocation {
    pub fn parse(repo_url: &str) -> Self {
        let url = repo_url.trim();
        let url = url.strip_suffix(".git").unwrap_or(url).to_string();
        let base = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(&url)
            .to_string();
        Self { url, base }
    }

    pub fn belongs_to(&self, provider: &str) -> bool {
        self.base.contains(provider)
    }

    /// HTTPS clone URL with credentials embedded.
    fn authenticated_url(&self, username: &str, token: &str) -> String {
        format!("https://{username}:{token}@{}.git", self.base)
    }
}

/// Clones repositories and packs them into prompt context.
#[derive(Debug, Clone)]
pub struct RepoReader<R = SystemRunner> {
    config: RepoConfig,
    runner: R,
}

impl RepoReader<SystemRunner> {
    pub fn new(config: RepoConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: CommandRunner> RepoReader<R> {
    pub fn with_runner(config: RepoConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Clone `branch` of `repo_url` and return the repomix rendering of it.
    ///
    /// The scratch checkout is removed before returning, on success and on
    /// every error path.
    #[instrument(skip_all, fields(branch))]
    pub fn read_repo_context(&self, repo_url: &str, branch: &str) -> Result<String, RepoReadError> {
        let location = RepoLocation::parse(repo_url);
        if !location.belongs_to(&self.config.provider) {
            warn!(url = %location.url, provider = %self.config.provider, "provider mismatch");
            return Err(RepoReadError::ProviderMismatch {
                url: location.url,
                provider: self.config.provider.clone(),
            });
        }

        info!(url = %location.url, branch, "reading repository");
        let scratch = tempfile::tempdir().map_err(|err| RepoReadError::Unexpected {
            url: location.url.clone(),
            source: anyhow::Error::new(err).context("create scratch directory"),
        })?;
        debug!(path = %scratch.path().display(), "cloning into scratch directory");

        self.clone_branch(&location, branch, scratch.path())?;
        debug!("clone finished");

        let packed = self.pack(&location, scratch.path())?;
        debug!(bytes = packed.len(), "repomix finished");
        Ok(packed)
    }

    fn clone_branch(
        &self,
        location: &RepoLocation,
        branch: &str,
        dest: &Path,
    ) -> Result<(), RepoReadError> {
        let source = location.authenticated_url(&self.config.username, &self.config.token);
        let mut cmd = Command::new("git");
        cmd.arg("clone")
            .arg("-b")
            .arg(branch)
            .arg(&source)
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0");

        let output = self.run_step("git", "git clone", cmd, self.config.clone_timeout, location)?;
        if !output.success() {
            let tail = output
                .tail_lines(CLONE_ERROR_TAIL_LINES)
                .into_iter()
                .map(|line| self.redact(&line))
                .collect::<Vec<_>>()
                .join("\n");
            warn!(exit_code = ?output.exit_code, "git clone failed");
            return Err(RepoReadError::CloneFailed {
                url: location.url.clone(),
                output: tail,
            });
        }
        Ok(())
    }

    fn pack(&self, location: &RepoLocation, checkout: &Path) -> Result<String, RepoReadError> {
        let mut cmd = Command::new("npx");
        cmd.args(["-y", "repomix", "--stdout"]).current_dir(checkout);

        let output = self.run_step("npx", "repomix", cmd, self.config.pack_timeout, location)?;
        if !output.success() {
            warn!(exit_code = ?output.exit_code, "repomix failed");
            return Err(RepoReadError::PackFailed {
                stderr: output.stderr_lossy().trim().to_string(),
            });
        }
        Ok(output.stdout_lossy().trim().to_string())
    }

    /// Run one subprocess step, mapping spawn failures and timeouts.
    fn run_step(
        &self,
        tool: &str,
        stage: &str,
        cmd: Command,
        timeout: Duration,
        location: &RepoLocation,
    ) -> Result<CommandOutput, RepoReadError> {
        let description = self.redact(&describe(&cmd));
        debug!(command = %description, "running step");
        let output = self
            .runner
            .run(cmd, timeout, self.config.output_limit_bytes)
            .map_err(|err| {
                if is_missing_executable(&err) {
                    error!(tool, "executable not found");
                    RepoReadError::MissingTool {
                        tool: tool.to_string(),
                    }
                } else {
                    RepoReadError::Unexpected {
                        url: location.url.clone(),
                        source: err.context(description.clone()),
                    }
                }
            })?;
        if output.timed_out {
            error!(stage, timeout_secs = timeout.as_secs(), "step timed out");
            return Err(RepoReadError::Timeout {
                stage: stage.to_string(),
                timeout,
            });
        }
        Ok(output)
    }

    fn redact(&self, text: &str) -> String {
        if self.config.token.is_empty() {
            return text.to_string();
        }
        text.replace(&self.config.token, "***")
    }
}
