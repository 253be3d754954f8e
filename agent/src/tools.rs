//! Function tools exposed to the root agent and their dispatcher.

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Value, json};
use skills::config::SkillsConfig;
use skills::email::EmailSender;
use skills::repo::RepoReader;
use tracing::{info, instrument};

use crate::definitions::{ParameterSpec, ToolSpec};

pub const GET_CURRENT_TIME: &str = "get_current_time";
pub const READ_REPO_CONTEXT: &str = "read_repo_context";
pub const SEND_EMAIL: &str = "send_email";

/// Returns the current time in a specified city.
pub fn get_current_time(city: &str) -> Value {
    json!({ "status": "success", "city": city, "time": "10:30 AM" })
}

/// Declarations of every function tool, in registration order.
pub fn function_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec::Function {
            name: GET_CURRENT_TIME.to_string(),
            description: "Returns the current time in a specified city.".to_string(),
            parameters: vec![ParameterSpec::new("city", "City name")],
        },
        ToolSpec::Function {
            name: READ_REPO_CONTEXT.to_string(),
            description: "Clones a repository branch and returns its packed contents.".to_string(),
            parameters: vec![
                ParameterSpec::new("repo_url", "HTTPS URL of the repository"),
                ParameterSpec::new("branch", "Branch to read"),
            ],
        },
        ToolSpec::Function {
            name: SEND_EMAIL.to_string(),
            description: "Sends a plain-text email.".to_string(),
            parameters: vec![
                ParameterSpec::new("to", "Recipient address"),
                ParameterSpec::new("subject", "Subject line"),
                ParameterSpec::new("body", "Message body"),
            ],
        },
    ]
}

/// Dispatches function-tool calls by name.
#[derive(Debug, Clone)]
pub struct Toolbox {
    skills: SkillsConfig,
}

impl Toolbox {
    pub fn new(skills: SkillsConfig) -> Self {
        Self { skills }
    }

    #[instrument(skip_all, fields(tool = name))]
    pub fn call(&self, name: &str, args: &Value) -> Result<Value> {
        info!("calling tool");
        match name {
            GET_CURRENT_TIME => Ok(get_current_time(string_arg(args, "city")?)),
            READ_REPO_CONTEXT => {
                let config = self.skills.repo.resolve()?;
                let context = RepoReader::new(config)
                    .read_repo_context(string_arg(args, "repo_url")?, string_arg(args, "branch")?)?;
                Ok(Value::String(context))
            }
            SEND_EMAIL => {
                let config = self.skills.smtp.resolve()?;
                let receipt = EmailSender::connect(&config)?.send(
                    string_arg(args, "to")?,
                    string_arg(args, "subject")?,
                    string_arg(args, "body")?,
                )?;
                serde_json::to_value(receipt).context("serialize email receipt")
            }
            other => bail!("unknown tool '{other}'"),
        }
    }
}

fn string_arg<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("missing string argument '{key}'"))
}
