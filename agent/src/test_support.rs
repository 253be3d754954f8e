//! Test-only helpers for callbacks and model-backed agents.

use std::cell::RefCell;

use anyhow::{Result, anyhow};

use crate::callbacks::CallbackContext;
use crate::response::ModelResponse;
use crate::split_agent::Model;

/// Deterministic callback context.
pub fn callback_ctx() -> CallbackContext {
    CallbackContext::new("root_agent", "inv-1")
}

/// Model that always returns the same response (or error) and records prompts.
pub struct ScriptedModel {
    result: std::result::Result<ModelResponse, String>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedModel {
    pub fn response(response: ModelResponse) -> Self {
        Self {
            result: Ok(response),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::response(ModelResponse::from_text(text))
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Model for ScriptedModel {
    fn generate(&self, prompt: &str) -> Result<ModelResponse> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.result.clone().map_err(|message| anyhow!(message))
    }
}
