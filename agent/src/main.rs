//! Command-line front end for the labeled-output toolkit.
//!
//! Text commands read the model output from stdin and write to stdout;
//! diagnostics go to stderr (`RUST_LOG`).

use std::borrow::Cow;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use agent::config::{DEFAULT_CONFIG_PATH, load_config};
use agent::core::date::formatted_date_today;
use agent::core::prefix::strip_known_prefixes;
use agent::core::render::{format_single, split_messages};
use agent::core::segmenter::segment;
use agent::core::types::Vocabulary;
use agent::definitions::{root_agent, search_agent};
use agent::tools::{READ_REPO_CONTEXT, SEND_EMAIL, Toolbox};
use agent::{exit_codes, logging};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Parser)]
#[command(
    name = "agent",
    version,
    about = "Split labeled LLM output into reasoning and answer"
)]
struct Cli {
    /// Path to the TOML config (missing file means defaults).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VocabularyArg {
    /// PENSAMENTO: / RESPOSTA:
    Thought,
    /// PLANEJAMENTO: / RACIONAL: / RESPOSTA FINAL:
    Plan,
}

impl VocabularyArg {
    fn vocabulary(self) -> &'static Vocabulary {
        match self {
            VocabularyArg::Thought => Vocabulary::thought_answer(),
            VocabularyArg::Plan => Vocabulary::plan_rationale_answer(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgentArg {
    Root,
    Search,
}

#[derive(Subcommand)]
enum Command {
    /// Print the labeled sections of stdin as JSON.
    Segment {
        #[arg(long, value_enum, default_value_t = VocabularyArg::Thought)]
        vocabulary: VocabularyArg,
    },
    /// Print one JSON display message per line (thinking, then answer).
    Split {
        #[arg(long, value_enum, default_value_t = VocabularyArg::Thought)]
        vocabulary: VocabularyArg,
    },
    /// Print stdin as a single formatted message, or unchanged if unlabeled.
    Format {
        #[arg(long, value_enum, default_value_t = VocabularyArg::Plan)]
        vocabulary: VocabularyArg,
    },
    /// Strip echoed answer prefixes from stdin.
    Clean,
    /// Print today's date line.
    Date,
    /// Print an agent definition as JSON.
    Definition {
        #[arg(long, value_enum, default_value_t = AgentArg::Root)]
        agent: AgentArg,
        #[arg(long, value_enum, default_value_t = VocabularyArg::Thought)]
        vocabulary: VocabularyArg,
    },
    /// Clone a repository branch and print its repomix rendering.
    ReadRepo {
        #[arg(long)]
        url: String,
        #[arg(long)]
        branch: String,
    },
    /// Send a plain-text email and print the receipt.
    SendEmail {
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FAILURE);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Segment { vocabulary } => cmd_segment(vocabulary.vocabulary()),
        Command::Split { vocabulary } => cmd_split(vocabulary.vocabulary()),
        Command::Format { vocabulary } => cmd_format(vocabulary.vocabulary()),
        Command::Clean => cmd_clean(),
        Command::Date => {
            println!("{}", formatted_date_today());
            Ok(exit_codes::OK)
        }
        Command::Definition { agent, vocabulary } => {
            cmd_definition(&cli.config, agent, vocabulary.vocabulary())
        }
        Command::ReadRepo { url, branch } => cmd_tool(
            &cli.config,
            READ_REPO_CONTEXT,
            json!({ "repo_url": url, "branch": branch }),
        ),
        Command::SendEmail { to, subject, body } => cmd_tool(
            &cli.config,
            SEND_EMAIL,
            json!({ "to": to, "subject": subject, "body": body }),
        ),
    }
}

fn cmd_segment(vocabulary: &Vocabulary) -> Result<i32> {
    let raw = read_stdin()?;
    let output = segment(&raw, vocabulary);
    print_json(&output)?;
    Ok(if output.is_empty() {
        exit_codes::NO_OUTPUT
    } else {
        exit_codes::OK
    })
}

fn cmd_split(vocabulary: &Vocabulary) -> Result<i32> {
    let raw = read_stdin()?;
    let messages = split_messages(&segment(&raw, vocabulary));
    if messages.is_empty() {
        return Ok(exit_codes::NO_OUTPUT);
    }
    for message in &messages {
        println!(
            "{}",
            serde_json::to_string(message).context("serialize message")?
        );
    }
    Ok(exit_codes::OK)
}

fn cmd_format(vocabulary: &Vocabulary) -> Result<i32> {
    let raw = read_stdin()?;
    match format_single(&segment(&raw, vocabulary)) {
        Some(formatted) => println!("{formatted}"),
        None => print!("{raw}"),
    }
    Ok(exit_codes::OK)
}

fn cmd_clean() -> Result<i32> {
    let raw = read_stdin()?;
    match strip_known_prefixes(&raw) {
        Cow::Owned(cleaned) => println!("{cleaned}"),
        Cow::Borrowed(_) => print!("{raw}"),
    }
    Ok(exit_codes::OK)
}

fn cmd_definition(config_path: &Path, agent: AgentArg, vocabulary: &Vocabulary) -> Result<i32> {
    let cfg = load_config(config_path)?;
    let today = formatted_date_today();
    let definition = match agent {
        AgentArg::Root => root_agent(&cfg.agent, Some(&today), vocabulary)?,
        AgentArg::Search => search_agent(&cfg.agent, Some(&today))?,
    };
    print_json(&definition)?;
    Ok(exit_codes::OK)
}

/// Run a skill through the same dispatcher the agent uses.
fn cmd_tool(config_path: &Path, name: &str, args: Value) -> Result<i32> {
    let cfg = load_config(config_path)?.apply_env(|key| std::env::var(key).ok())?;
    match Toolbox::new(cfg.skills).call(name, &args)? {
        Value::String(text) => println!("{text}"),
        other => print_json(&other)?,
    }
    Ok(exit_codes::OK)
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("read stdin")?;
    Ok(buf)
}

/// Serialize `value` to pretty-printed JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{payload}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_segment_defaults_to_thought_vocabulary() {
        let cli = Cli::parse_from(["agent", "segment"]);
        assert!(matches!(
            cli.command,
            Command::Segment {
                vocabulary: VocabularyArg::Thought
            }
        ));
        assert_eq!(cli.config, PathBuf::from("agent.toml"));
    }

    #[test]
    fn parse_format_defaults_to_plan_vocabulary() {
        let cli = Cli::parse_from(["agent", "format"]);
        assert!(matches!(
            cli.command,
            Command::Format {
                vocabulary: VocabularyArg::Plan
            }
        ));
    }

    #[test]
    fn parse_global_config_after_subcommand() {
        let cli = Cli::parse_from(["agent", "definition", "--agent", "search", "--config", "x.toml"]);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(matches!(
            cli.command,
            Command::Definition {
                agent: AgentArg::Search,
                ..
            }
        ));
    }

    #[test]
    fn parse_read_repo_requires_branch() {
        assert!(Cli::try_parse_from(["agent", "read-repo", "--url", "https://github.com/a/b"]).is_err());
        let cli = Cli::parse_from([
            "agent",
            "read-repo",
            "--url",
            "https://github.com/a/b",
            "--branch",
            "main",
        ]);
        assert!(matches!(cli.command, Command::ReadRepo { .. }));
    }
}
