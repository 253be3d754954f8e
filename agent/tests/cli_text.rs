//! CLI tests for the stdin text commands.
//!
//! Spawns the agent binary, pipes model output on stdin and checks stdout
//! and exit codes.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use agent::exit_codes;

fn run_agent(args: &[&str], stdin: &str, cwd: &Path) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_agent"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn agent");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("agent output")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

#[test]
fn segment_prints_sections_as_json() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_agent(
        &["segment"],
        "PENSAMENTO: checar fuso\nRESPOSTA: São 10:30",
        temp.path(),
    );
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(json["fallback"], false);
    assert_eq!(json["sections"][0]["label"]["kind"], "thought");
    assert_eq!(json["sections"][0]["text"], "checar fuso");
    assert_eq!(json["sections"][1]["label"]["kind"], "answer");
    assert_eq!(json["sections"][1]["text"], "São 10:30");
}

#[test]
fn split_prints_one_message_per_line() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_agent(
        &["split"],
        "PENSAMENTO: pensei\nRESPOSTA: pronto",
        temp.path(),
    );
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let lines: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["kind"], "thought");
    assert_eq!(lines[0]["text"], "💭 pensei");
    assert_eq!(lines[1]["kind"], "answer");
    assert_eq!(lines[1]["text"], "🤖 pronto");
}

#[test]
fn blank_input_exits_with_no_output_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_agent(&["split"], "  \n\t ", temp.path());
    assert_eq!(output.status.code(), Some(exit_codes::NO_OUTPUT));
    assert!(stdout(&output).is_empty());

    let output = run_agent(&["segment"], "", temp.path());
    assert_eq!(output.status.code(), Some(exit_codes::NO_OUTPUT));
}

#[test]
fn format_renders_reasoning_block() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_agent(
        &["format"],
        "PLANEJAMENTO: p\nRACIONAL: r\nRESPOSTA FINAL: f",
        temp.path(),
    );
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let text = stdout(&output);
    assert!(text.starts_with("```\n💭 PENSAMENTO\n"));
    assert!(text.contains("📋 Plano: p\n🧠 Racional: r\n```\n\n🤖 f"));
}

#[test]
fn format_passes_unlabeled_text_through() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_agent(&["format"], "Só uma resposta.\n", temp.path());
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output), "Só uma resposta.\n");
}

#[test]
fn clean_strips_echoed_prefixes() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_agent(&["clean"], "RESPOSTA FINAL: São 10:30 AM", temp.path());
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output), "São 10:30 AM\n");
}

#[test]
fn clean_leaves_unprefixed_text_verbatim() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = run_agent(&["clean"], "  São 10:30 AM.  \n\n", temp.path());
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output), "  São 10:30 AM.  \n\n");
}
