//! Agent and tool definitions handed to the agent framework.

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};
use skills::rag::RagToolParams;
use tracing::debug;

use crate::core::types::Vocabulary;
use crate::tools;

const ROOT_TEMPLATE: &str = include_str!("prompts/root.md");
const SEARCH_TEMPLATE: &str = include_str!("prompts/search.md");

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const ROOT_AGENT_NAME: &str = "root_agent";
pub const SEARCH_AGENT_NAME: &str = "SearchAgent";

/// `[agent]` section of the app config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentSettings {
    pub model: String,
    pub search_model: String,
    /// Expose the model's built-in thoughts.
    pub include_thoughts: bool,
    /// Token budget for built-in thinking.
    pub thinking_budget: u32,
    /// Register the search agent as a tool of the root agent.
    pub enable_search: bool,
    /// RAG retrieval tools registered on the root agent.
    pub rag: Vec<RagToolParams>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            search_model: DEFAULT_MODEL.to_string(),
            include_thoughts: true,
            thinking_budget: 1024,
            enable_search: true,
            rag: Vec::new(),
        }
    }
}

impl AgentSettings {
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            anyhow::bail!("agent.model must not be empty");
        }
        if self.enable_search && self.search_model.trim().is_empty() {
            anyhow::bail!("agent.search_model must not be empty");
        }
        for params in &self.rag {
            params.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlannerConfig {
    pub include_thoughts: bool,
    pub thinking_budget: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    pub name: String,
    pub description: String,
}

impl ParameterSpec {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolSpec {
    Function {
        name: String,
        description: String,
        parameters: Vec<ParameterSpec>,
    },
    GoogleSearch,
    AgentTool {
        agent: Box<AgentDefinition>,
    },
    VertexRag(RagToolParams),
}

impl ToolSpec {
    pub fn name(&self) -> &str {
        match self {
            ToolSpec::Function { name, .. } => name,
            ToolSpec::GoogleSearch => "google_search",
            ToolSpec::AgentTool { agent } => &agent.name,
            ToolSpec::VertexRag(params) => &params.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentDefinition {
    pub name: String,
    pub model: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub instruction: String,
    pub tools: Vec<ToolSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planner: Option<PlannerConfig>,
}

/// Template engine wrapper around minijinja.
struct InstructionEngine {
    env: Environment<'static>,
}

impl InstructionEngine {
    fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.add_template("root", ROOT_TEMPLATE)
            .expect("root template should be valid");
        env.add_template("search", SEARCH_TEMPLATE)
            .expect("search template should be valid");
        Self { env }
    }

    fn render(&self, name: &str, today: Option<&str>, vocabulary: &Vocabulary) -> Result<String> {
        let template = self.env.get_template(name)?;
        let rendered = template.render(context! {
            today => today.map(str::trim).filter(|s| !s.is_empty()),
            labels => vocabulary.labels(),
        })?;
        Ok(rendered.trim().to_string())
    }
}

/// Agent that answers with Google Search results.
pub fn search_agent(settings: &AgentSettings, today: Option<&str>) -> Result<AgentDefinition> {
    let instruction = InstructionEngine::new()
        .render("search", today, Vocabulary::thought_answer())
        .context("render search agent instruction")?;
    Ok(AgentDefinition {
        name: SEARCH_AGENT_NAME.to_string(),
        model: settings.search_model.clone(),
        description: String::new(),
        instruction,
        tools: vec![ToolSpec::GoogleSearch],
        planner: None,
    })
}

/// Time-telling root agent with thinking enabled.
///
/// The instruction asks the model for the labels of `vocabulary`, which is
/// what the output callbacks segment on.
pub fn root_agent(
    settings: &AgentSettings,
    today: Option<&str>,
    vocabulary: &Vocabulary,
) -> Result<AgentDefinition> {
    settings.validate()?;
    let instruction = InstructionEngine::new()
        .render("root", today, vocabulary)
        .context("render root agent instruction")?;

    let mut tools = tools::function_specs();
    if settings.enable_search {
        tools.push(ToolSpec::AgentTool {
            agent: Box::new(search_agent(settings, today)?),
        });
    }
    for params in &settings.rag {
        tools.push(ToolSpec::VertexRag(params.clone().build()?));
    }
    debug!(tools = tools.len(), "built root agent definition");

    Ok(AgentDefinition {
        name: ROOT_AGENT_NAME.to_string(),
        model: settings.model.clone(),
        description: "Tells the current time in a specified city.".to_string(),
        instruction,
        tools,
        planner: Some(PlannerConfig {
            include_thoughts: settings.include_thoughts,
            thinking_budget: settings.thinking_budget,
        }),
    })
}
