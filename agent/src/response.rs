//! Minimal model response shapes exchanged with the agent framework.

use serde::{Deserialize, Serialize};

pub const MODEL_ROLE: &str = "model";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Marks reasoning shown separately from the answer.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub thought: bool,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: false,
        }
    }

    pub fn thought(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: MODEL_ROLE.to_string(),
            parts,
        }
    }
}

/// One generation result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResponse {
    #[serde(default)]
    pub content: Option<Content>,
}

impl ModelResponse {
    /// Response with a single model text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: Some(Content::model(vec![Part::text(text)])),
        }
    }

    /// Text of the first part.
    ///
    /// `None` when there is no content or no parts; a part without text
    /// reads as empty.
    pub fn first_text(&self) -> Option<&str> {
        let part = self.content.as_ref()?.parts.first()?;
        Some(part.text.as_deref().unwrap_or_default())
    }
}
