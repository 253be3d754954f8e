//! Test-only doubles for subprocesses, SMTP and the environment.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::process::Command;
use std::time::Duration;

use anyhow::{Result, anyhow};
use lettre::Transport;
use lettre::address::Envelope;

use crate::config::RepoConfig;
use crate::process::{CommandOutput, CommandRunner};

/// Command observed by [`ScriptedRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<String>,
    pub timeout: Duration,
}

/// Runner that replays queued results and records every command it sees.
pub struct ScriptedRunner {
    responses: RefCell<VecDeque<Result<CommandOutput>>>,
    calls: RefCell<Vec<RecordedCommand>>,
}

impl ScriptedRunner {
    pub fn new(responses: Vec<Result<CommandOutput>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(
        &self,
        cmd: Command,
        timeout: Duration,
        _output_limit_bytes: usize,
    ) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(RecordedCommand {
            program: cmd.get_program().to_string_lossy().into_owned(),
            args: cmd
                .get_args()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect(),
            current_dir: cmd
                .get_current_dir()
                .map(|dir| dir.to_string_lossy().into_owned()),
            timeout,
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted response left")))
    }
}

/// Completed process output with the given exit code.
pub fn exit(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        exit_code: Some(code),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
        ..CommandOutput::default()
    }
}

/// Repository config for `github.com` with short timeouts.
pub fn repo_config() -> RepoConfig {
    RepoConfig {
        provider: "github.com".to_string(),
        username: "octocat".to_string(),
        token: "t0k3n".to_string(),
        clone_timeout: Duration::from_secs(30),
        pack_timeout: Duration::from_secs(60),
        output_limit_bytes: 1_000_000,
    }
}

/// Environment snapshot for `SkillsConfig::apply_env`.
pub fn env_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Email captured by [`RecordingTransport`].
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub from: Option<String>,
    pub recipients: Vec<String>,
    pub raw: String,
}

/// lettre transport that stores messages instead of sending them.
#[derive(Default)]
pub struct RecordingTransport {
    sent: RefCell<Vec<SentEmail>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.borrow().clone()
    }
}

impl Transport for RecordingTransport {
    type Ok = ();
    type Error = io::Error;

    fn send_raw(&self, envelope: &Envelope, email: &[u8]) -> Result<Self::Ok, Self::Error> {
        if self.fail {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ));
        }
        self.sent.borrow_mut().push(SentEmail {
            from: envelope.from().map(ToString::to_string),
            recipients: envelope.to().iter().map(ToString::to_string).collect(),
            raw: String::from_utf8_lossy(email).into_owned(),
        });
        Ok(())
    }
}
