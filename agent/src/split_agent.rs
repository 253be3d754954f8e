//! Agent wrapper that shows reasoning and answer as separate messages.
//!
//! The wrapped [`Model`] produces one block of text per turn. The wrapper
//! segments it and yields one [`Event`] per display message: a thinking
//! event (only when there is reasoning) followed by the answer event.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::core::render::{MessageKind, split_messages};
use crate::core::segmenter::segment;
use crate::core::types::Vocabulary;
use crate::response::{Content, ModelResponse, Part};

/// Text generation backend (owned by the agent framework).
pub trait Model {
    fn generate(&self, prompt: &str) -> Result<ModelResponse>;
}

/// Outbound unit handed back to the framework's event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub author: String,
    pub content: Content,
}

impl Event {
    pub fn is_thought(&self) -> bool {
        self.content.parts.iter().any(|part| part.thought)
    }

    pub fn text(&self) -> &str {
        self.content
            .parts
            .first()
            .and_then(|part| part.text.as_deref())
            .unwrap_or_default()
    }
}

/// Wraps a [`Model`] and splits its output into thinking / answer events.
pub struct ThoughtSplitAgent<'v, M> {
    name: String,
    model: M,
    vocabulary: &'v Vocabulary,
}

impl<'v, M: Model> ThoughtSplitAgent<'v, M> {
    pub fn new(name: impl Into<String>, model: M) -> Self {
        Self {
            name: name.into(),
            model,
            vocabulary: Vocabulary::thought_answer(),
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: &'v Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run one turn.
    ///
    /// A response without content (or with blank text) yields no events.
    #[instrument(skip_all, fields(agent = %self.name))]
    pub fn run(&self, prompt: &str) -> Result<Vec<Event>> {
        let response = self
            .model
            .generate(prompt)
            .with_context(|| format!("generate response for agent '{}'", self.name))?;
        let Some(text) = response.first_text() else {
            debug!("model returned no content");
            return Ok(Vec::new());
        };

        let segmented = segment(text, self.vocabulary);
        let events: Vec<Event> = split_messages(&segmented)
            .into_iter()
            .map(|message| {
                let part = match message.kind {
                    MessageKind::Thought => Part::thought(message.text),
                    MessageKind::Answer => Part::text(message.text),
                };
                Event {
                    author: self.name.clone(),
                    content: Content::model(vec![part]),
                }
            })
            .collect();
        debug!(
            events = events.len(),
            fallback = segmented.is_fallback(),
            "split model output"
        );
        Ok(events)
    }
}
