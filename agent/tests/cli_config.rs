//! CLI tests for commands that read `agent.toml` and the environment.

use std::fs;
use std::process::Command;

use agent::exit_codes;

const SKILL_VARS: [&str; 8] = [
    "REPO_PROVIDER",
    "REPO_USERNAME",
    "REPO_TOKEN",
    "SMTP_HOST",
    "SMTP_PORT",
    "SMTP_USER",
    "SMTP_PASSWORD",
    "SMTP_FROM",
];

fn agent_cmd(cwd: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_agent"));
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    for var in SKILL_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn definition_uses_config_file_models() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(
        temp.path().join("agent.toml"),
        "[agent]\nmodel = \"gemini-2.5-pro\"\nthinking_budget = 2048\n",
    )
    .expect("write config");

    let output = agent_cmd(temp.path())
        .args(["definition", "--agent", "root"])
        .output()
        .expect("agent definition");
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["name"], "root_agent");
    assert_eq!(json["model"], "gemini-2.5-pro");
    assert_eq!(json["planner"]["thinking_budget"], 2048);
    assert!(
        json["instruction"]
            .as_str()
            .expect("instruction")
            .contains("Today is ")
    );
}

#[test]
fn invalid_config_fails_with_context() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("broken.toml");
    fs::write(&path, "[agent\nmodel = 1").expect("write config");

    let output = agent_cmd(temp.path())
        .args(["definition", "--config"])
        .arg(&path)
        .output()
        .expect("agent definition");
    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parse"), "stderr: {stderr}");
}

#[test]
fn read_repo_without_credentials_fails_fast() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = agent_cmd(temp.path())
        .args([
            "read-repo",
            "--url",
            "https://github.com/octocat/hello",
            "--branch",
            "main",
        ])
        .output()
        .expect("agent read-repo");
    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("REPO_TOKEN"), "stderr: {stderr}");
}

#[test]
fn send_email_without_smtp_settings_fails_fast() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = agent_cmd(temp.path())
        .args([
            "send-email",
            "--to",
            "ana@example.com",
            "--subject",
            "oi",
            "--body",
            "tudo bem?",
        ])
        .output()
        .expect("agent send-email");
    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SMTP_HOST"), "stderr: {stderr}");
}
