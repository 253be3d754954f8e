//! Turn segmented output into display text.
//!
//! Two call sites consume the segmenter:
//! - [`split_messages`]: one message per role (thinking, then answer).
//! - [`format_single`]: one message with the reasoning in a fenced block.

use serde::Serialize;

use crate::core::types::{SectionKind, SegmentedOutput};

pub const THINKING_INDICATOR: &str = "💭";
pub const ANSWER_INDICATOR: &str = "🤖";
pub const SEPARATOR_WIDTH: usize = 40;

const SEPARATOR_CHAR: char = '─';
const FENCE: &str = "```";

/// Kind of outbound display message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Thought,
    Answer,
}

/// One outbound unit for the end user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMessage {
    pub kind: MessageKind,
    pub text: String,
}

/// Multi-message rendering.
///
/// A thinking message is emitted only when some reasoning section has text;
/// an answer message always follows, even if the model omitted the answer.
/// Empty output renders nothing.
pub fn split_messages(output: &SegmentedOutput) -> Vec<DisplayMessage> {
    if output.is_empty() {
        return Vec::new();
    }
    let mut messages = Vec::with_capacity(2);

    let reasoning: Vec<&str> = output
        .reasoning()
        .map(|section| section.text.as_str())
        .collect();
    if !reasoning.is_empty() {
        messages.push(DisplayMessage {
            kind: MessageKind::Thought,
            text: format!("{THINKING_INDICATOR} {}", reasoning.join("\n\n")),
        });
    }

    let answer = output
        .answer()
        .map(|section| section.text.as_str())
        .unwrap_or_default();
    messages.push(DisplayMessage {
        kind: MessageKind::Answer,
        text: format!("{ANSWER_INDICATOR} {answer}").trim_end().to_string(),
    });
    messages
}

/// Single-message rendering.
///
/// Returns `None` when nothing was labeled (empty or fallback output) or
/// when every labeled section is empty: the caller should keep the original
/// text as is.
pub fn format_single(output: &SegmentedOutput) -> Option<String> {
    if output.is_empty() || output.is_fallback() {
        return None;
    }
    let reasoning: Vec<_> = output.reasoning().collect();
    let answer = output.answer().filter(|answer| !answer.text.is_empty());
    if reasoning.is_empty() && answer.is_none() {
        return None;
    }
    let mut lines: Vec<String> = Vec::new();

    if !reasoning.is_empty() {
        lines.push(FENCE.to_string());
        lines.push(format!("{THINKING_INDICATOR} PENSAMENTO"));
        lines.push(SEPARATOR_CHAR.to_string().repeat(SEPARATOR_WIDTH));
        for section in reasoning {
            lines.push(format!("{}{}", reasoning_heading(section.kind()), section.text));
        }
        lines.push(FENCE.to_string());
        lines.push(String::new());
    }

    if let Some(answer) = answer {
        lines.push(format!("{ANSWER_INDICATOR} {}", answer.text));
    }

    Some(lines.join("\n"))
}

fn reasoning_heading(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Plan => "📋 Plano: ",
        SectionKind::Rationale => "🧠 Racional: ",
        SectionKind::Thought => "💭 Pensamento: ",
        SectionKind::Answer => "",
    }
}
