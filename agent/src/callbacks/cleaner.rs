//! Answer-prefix cleanup callback.

use std::borrow::Cow;

use crate::callbacks::{AfterModelCallback, CallbackContext};
use crate::core::prefix::strip_known_prefixes;
use crate::response::ModelResponse;

/// Drops echoed `RESPOSTA FINAL:` style prefixes from the answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerCleaner;

impl AfterModelCallback for AnswerCleaner {
    fn name(&self) -> &'static str {
        "answer_cleaner"
    }

    fn after_model(
        &self,
        _ctx: &CallbackContext,
        response: &ModelResponse,
    ) -> Option<ModelResponse> {
        let text = response.first_text()?;
        match strip_known_prefixes(text) {
            Cow::Owned(cleaned) => Some(ModelResponse::from_text(cleaned)),
            Cow::Borrowed(_) => None,
        }
    }
}
