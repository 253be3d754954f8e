//! After-model callbacks that post-process a response before display.
//!
//! A callback returns `None` to keep the response as is, or a replacement.
//! Callbacks run in order and the first replacement wins.

use tracing::debug;

use crate::response::ModelResponse;

pub mod cleaner;
pub mod formatter;

pub use cleaner::AnswerCleaner;
pub use formatter::ResponseFormatter;

/// Invocation metadata handed to every callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackContext {
    pub agent_name: String,
    pub invocation_id: String,
}

impl CallbackContext {
    pub fn new(agent_name: impl Into<String>, invocation_id: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            invocation_id: invocation_id.into(),
        }
    }
}

pub trait AfterModelCallback {
    fn name(&self) -> &'static str;

    fn after_model(&self, ctx: &CallbackContext, response: &ModelResponse)
    -> Option<ModelResponse>;
}

/// Run `callbacks` in order; the first replacement stops the chain.
pub fn run_after_model_callbacks(
    ctx: &CallbackContext,
    callbacks: &[&dyn AfterModelCallback],
    response: ModelResponse,
) -> ModelResponse {
    for callback in callbacks {
        if let Some(replacement) = callback.after_model(ctx, &response) {
            debug!(
                agent = %ctx.agent_name,
                invocation = %ctx.invocation_id,
                callback = callback.name(),
                "response replaced"
            );
            return replacement;
        }
    }
    response
}
