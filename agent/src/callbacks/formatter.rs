//! Single-message formatting callback.

use tracing::debug;

use crate::callbacks::{AfterModelCallback, CallbackContext};
use crate::core::render::format_single;
use crate::core::segmenter::segment;
use crate::core::types::Vocabulary;
use crate::response::ModelResponse;

/// Rewrites labeled output into one message with a fenced reasoning block.
///
/// Unlabeled output is left alone (`None`), so the framework shows the
/// model's text verbatim.
#[derive(Debug, Clone, Copy)]
pub struct ResponseFormatter<'v> {
    vocabulary: &'v Vocabulary,
}

impl Default for ResponseFormatter<'static> {
    fn default() -> Self {
        Self::new(Vocabulary::plan_rationale_answer())
    }
}

impl<'v> ResponseFormatter<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }
}

impl AfterModelCallback for ResponseFormatter<'_> {
    fn name(&self) -> &'static str {
        "response_formatter"
    }

    fn after_model(
        &self,
        _ctx: &CallbackContext,
        response: &ModelResponse,
    ) -> Option<ModelResponse> {
        let text = response.first_text()?;
        let segmented = segment(text, self.vocabulary);
        let formatted = format_single(&segmented)?;
        debug!(
            sections = segmented.sections().len(),
            "formatted labeled response"
        );
        Some(ModelResponse::from_text(formatted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Label, SectionKind};
    use crate::response::{Content, MODEL_ROLE};
    use crate::test_support::callback_ctx;

    #[test]
    fn formats_labeled_response() {
        let response = ModelResponse::from_text(
            "PLANEJAMENTO: chamar get_current_time\nRESPOSTA FINAL: São 10:30 AM",
        );
        let out = ResponseFormatter::default()
            .after_model(&callback_ctx(), &response)
            .expect("replacement");
        let content = out.content.expect("content");
        assert_eq!(content.role, MODEL_ROLE);
        assert_eq!(content.parts.len(), 1);
        let text = content.parts[0].text.as_deref().expect("text");
        assert!(text.contains("📋 Plano: chamar get_current_time"));
        assert!(text.ends_with("🤖 São 10:30 AM"));
    }

    #[test]
    fn leaves_unlabeled_response_alone() {
        let response = ModelResponse::from_text("São 10:30 AM em Lisboa.");
        assert_eq!(
            ResponseFormatter::default().after_model(&callback_ctx(), &response),
            None
        );
    }

    #[test]
    fn ignores_responses_without_parts() {
        let formatter = ResponseFormatter::default();
        assert_eq!(
            formatter.after_model(&callback_ctx(), &ModelResponse::default()),
            None
        );
        let no_parts = ModelResponse {
            content: Some(Content::model(Vec::new())),
        };
        assert_eq!(formatter.after_model(&callback_ctx(), &no_parts), None);
    }

    #[test]
    fn uses_configured_vocabulary() {
        let formatter = ResponseFormatter::new(Vocabulary::thought_answer());
        let response = ModelResponse::from_text("PENSAMENTO: hmm\nRESPOSTA: ok");
        let out = formatter
            .after_model(&callback_ctx(), &response)
            .expect("replacement");
        let text = out.first_text().expect("text");
        assert!(text.contains("💭 Pensamento: hmm"));
        assert!(text.ends_with("🤖 ok"));
    }

    #[test]
    fn keeps_response_when_every_section_is_empty() {
        let response = ModelResponse::from_text("RACIONAL:\nRESPOSTA FINAL:   ");
        assert_eq!(
            ResponseFormatter::default().after_model(&callback_ctx(), &response),
            None
        );
    }

    #[test]
    fn accepts_vocabulary_built_at_runtime() {
        let vocabulary = Vocabulary::new(vec![
            Label::new(SectionKind::Thought, "REASONING:"),
            Label::new(SectionKind::Answer, "ANSWER:"),
        ])
        .expect("vocabulary");
        let formatter = ResponseFormatter::new(&vocabulary);
        let response = ModelResponse::from_text("REASONING: check tz\nANSWER: 10:30");
        let out = formatter
            .after_model(&callback_ctx(), &response)
            .expect("replacement");
        let text = out.first_text().expect("text");
        assert!(text.contains("💭 Pensamento: check tz"));
        assert!(text.ends_with("🤖 10:30"));
    }
}
