//! Parameters for the Vertex AI RAG retrieval tool.
//!
//! Retrieval itself is performed by the hosted service; this module only
//! validates and defaults what the agent definition hands over.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_TOOL_NAME: &str = "retrieve_rag_documentation";
pub const DEFAULT_SIMILARITY_TOP_K: u32 = 10;
pub const DEFAULT_VECTOR_DISTANCE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagToolParams {
    #[serde(default = "default_name")]
    pub name: String,
    pub description: String,
    /// Full corpus resource id (`projects/…/ragCorpora/…`).
    pub rag_corpus: String,
    #[serde(default = "default_top_k")]
    pub similarity_top_k: u32,
    #[serde(default = "default_threshold")]
    pub vector_distance_threshold: f64,
}

fn default_name() -> String {
    DEFAULT_TOOL_NAME.to_string()
}

fn default_top_k() -> u32 {
    DEFAULT_SIMILARITY_TOP_K
}

fn default_threshold() -> f64 {
    DEFAULT_VECTOR_DISTANCE_THRESHOLD
}

impl RagToolParams {
    pub fn new(description: impl Into<String>, rag_corpus: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            description: description.into(),
            rag_corpus: rag_corpus.into(),
            similarity_top_k: DEFAULT_SIMILARITY_TOP_K,
            vector_distance_threshold: DEFAULT_VECTOR_DISTANCE_THRESHOLD,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow!("rag tool name must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(anyhow!("rag tool '{}' requires a description", self.name));
        }
        if self.rag_corpus.trim().is_empty() {
            return Err(anyhow!("rag tool '{}' requires rag_corpus", self.name));
        }
        if self.similarity_top_k == 0 {
            return Err(anyhow!("rag tool '{}': similarity_top_k must be > 0", self.name));
        }
        if !self.vector_distance_threshold.is_finite() || self.vector_distance_threshold < 0.0 {
            return Err(anyhow!(
                "rag tool '{}': vector_distance_threshold must be a non-negative number",
                self.name
            ));
        }
        Ok(())
    }

    /// Validate and hand the parameters over for registration.
    pub fn build(self) -> Result<Self> {
        self.validate()?;
        info!(name = %self.name, corpus = %self.rag_corpus, "creating vertex rag tool");
        Ok(self)
    }
}
