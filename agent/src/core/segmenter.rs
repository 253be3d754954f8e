//! Split free-form model output into labeled sections.
//!
//! Each label's first marker occurrence opens its section; the section runs
//! until the next marker occurrence of any label (a repeat of itself
//! included) or the end of the text. Text before the first marker and text
//! after repeated markers is dropped. Nested or overlapping markers resolve
//! first-match-wins.

use std::ops::Range;

use crate::core::types::{LabeledSection, SegmentedOutput, Vocabulary};

/// Segment `raw` using `vocabulary`.
///
/// - Sections come back in text order, at most one per label.
/// - No marker and non-blank input: one implicit answer section holding the
///   trimmed input ([`SegmentedOutput::is_fallback`]).
/// - Blank input: no sections.
pub fn segment(raw: &str, vocabulary: &Vocabulary) -> SegmentedOutput {
    let occurrences = vocabulary.occurrences(raw);

    if occurrences.is_empty() {
        let span = trimmed_span(raw, 0..raw.len());
        if span.is_empty() {
            return SegmentedOutput::default();
        }
        return SegmentedOutput::implicit_answer(LabeledSection {
            label: vocabulary.answer_label().clone(),
            text: raw[span.clone()].to_string(),
            span,
        });
    }

    let mut seen = vec![false; vocabulary.labels().len()];
    let mut sections = Vec::new();
    for (i, (label_idx, marker)) in occurrences.iter().enumerate() {
        if std::mem::replace(&mut seen[*label_idx], true) {
            continue;
        }
        let end = occurrences
            .get(i + 1)
            .map(|(_, next)| next.start)
            .unwrap_or(raw.len());
        let span = trimmed_span(raw, marker.end..end);
        sections.push(LabeledSection {
            label: vocabulary.labels()[*label_idx].clone(),
            text: raw[span.clone()].to_string(),
            span,
        });
    }
    SegmentedOutput::labeled(sections)
}

/// Narrow `range` of `text` to exclude leading and trailing whitespace.
fn trimmed_span(text: &str, range: Range<usize>) -> Range<usize> {
    let slice = &text[range.clone()];
    let start = range.start + (slice.len() - slice.trim_start().len());
    let end = start + slice.trim().len();
    start..end
}
