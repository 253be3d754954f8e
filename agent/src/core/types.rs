//! Shared deterministic types for labeled model output.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use anyhow::{Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Semantic role of a labeled section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Free-form reasoning (`PENSAMENTO:`).
    Thought,
    /// Step plan (`PLANEJAMENTO:`).
    Plan,
    /// Justification (`RACIONAL:`).
    Rationale,
    /// Final answer shown to the user (`RESPOSTA:` / `RESPOSTA FINAL:`).
    Answer,
}

impl SectionKind {
    pub fn is_reasoning(self) -> bool {
        !matches!(self, SectionKind::Answer)
    }
}

/// A recognized marker and the role of the text that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub kind: SectionKind,
    /// Literal marker, matched case-insensitively (e.g. `PENSAMENTO:`).
    pub marker: String,
}

impl Label {
    pub fn new(kind: SectionKind, marker: impl Into<String>) -> Self {
        Self {
            kind,
            marker: marker.into(),
        }
    }
}

/// Ordered set of labels recognized at one call site, with its compiled matcher.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    labels: Vec<Label>,
    answer: usize,
    matcher: Regex,
}

static THOUGHT_ANSWER: LazyLock<Vocabulary> = LazyLock::new(|| {
    Vocabulary::new(vec![
        Label::new(SectionKind::Thought, "PENSAMENTO:"),
        Label::new(SectionKind::Answer, "RESPOSTA:"),
    ])
    .expect("thought/answer vocabulary should be valid")
});

static PLAN_RATIONALE_ANSWER: LazyLock<Vocabulary> = LazyLock::new(|| {
    Vocabulary::new(vec![
        Label::new(SectionKind::Plan, "PLANEJAMENTO:"),
        Label::new(SectionKind::Rationale, "RACIONAL:"),
        Label::new(SectionKind::Answer, "RESPOSTA FINAL:"),
    ])
    .expect("plan/rationale/answer vocabulary should be valid")
});

impl Vocabulary {
    /// Build a vocabulary.
    ///
    /// Requires at least one label, non-blank markers, no duplicate markers
    /// (ignoring case) and exactly one [`SectionKind::Answer`] label.
    pub fn new(labels: Vec<Label>) -> Result<Self> {
        if labels.is_empty() {
            bail!("vocabulary must contain at least one label");
        }
        let mut seen = HashSet::new();
        for label in &labels {
            if label.marker.trim().is_empty() {
                bail!("label marker must not be blank");
            }
            if !seen.insert(label.marker.to_lowercase()) {
                bail!("duplicate label marker '{}'", label.marker);
            }
        }
        let answers: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.kind == SectionKind::Answer)
            .map(|(idx, _)| idx)
            .collect();
        let &[answer] = answers.as_slice() else {
            bail!(
                "vocabulary must contain exactly one answer label (found {})",
                answers.len()
            );
        };
        let matcher = build_matcher(&labels)?;
        Ok(Self {
            labels,
            answer,
            matcher,
        })
    }

    /// `PENSAMENTO:` / `RESPOSTA:`.
    pub fn thought_answer() -> &'static Vocabulary {
        &THOUGHT_ANSWER
    }

    /// `PLANEJAMENTO:` / `RACIONAL:` / `RESPOSTA FINAL:`.
    pub fn plan_rationale_answer() -> &'static Vocabulary {
        &PLAN_RATIONALE_ANSWER
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn answer_label(&self) -> &Label {
        &self.labels[self.answer]
    }

    /// Marker occurrences in `text`, leftmost-first, as `(label index, marker range)`.
    pub(crate) fn occurrences(&self, text: &str) -> Vec<(usize, Range<usize>)> {
        self.matcher
            .captures_iter(text)
            .filter_map(|caps| {
                (0..self.labels.len()).find_map(|idx| {
                    caps.name(&group_name(idx))
                        .map(|m| (idx, m.range()))
                })
            })
            .collect()
    }
}

fn group_name(idx: usize) -> String {
    format!("l{idx}")
}

/// One case-insensitive alternation over every marker.
///
/// Longer markers are tried first so that, at the same position, a marker
/// never loses to one of its own prefixes.
fn build_matcher(labels: &[Label]) -> Result<Regex> {
    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by_key(|&idx| std::cmp::Reverse(labels[idx].marker.len()));
    let alternatives: Vec<String> = order
        .iter()
        .map(|&idx| {
            format!(
                "(?P<{}>{})",
                group_name(idx),
                regex::escape(&labels[idx].marker)
            )
        })
        .collect();
    Ok(Regex::new(&format!("(?i){}", alternatives.join("|")))?)
}

/// A label paired with the trimmed text that followed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledSection {
    pub label: Label,
    pub text: String,
    /// Byte range of `text` within the raw model output.
    pub span: Range<usize>,
}

impl LabeledSection {
    pub fn kind(&self) -> SectionKind {
        self.label.kind
    }
}

/// Sections found in one model response, in text order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentedOutput {
    sections: Vec<LabeledSection>,
    /// True when no marker matched and the whole text became the answer.
    fallback: bool,
}

impl SegmentedOutput {
    pub(crate) fn labeled(sections: Vec<LabeledSection>) -> Self {
        Self {
            sections,
            fallback: false,
        }
    }

    pub(crate) fn implicit_answer(section: LabeledSection) -> Self {
        Self {
            sections: vec![section],
            fallback: true,
        }
    }

    pub fn sections(&self) -> &[LabeledSection] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn get(&self, kind: SectionKind) -> Option<&LabeledSection> {
        self.sections.iter().find(|section| section.kind() == kind)
    }

    pub fn answer(&self) -> Option<&LabeledSection> {
        self.get(SectionKind::Answer)
    }

    /// Reasoning sections with non-empty text, in text order.
    pub fn reasoning(&self) -> impl Iterator<Item = &LabeledSection> {
        self.sections
            .iter()
            .filter(|section| section.kind().is_reasoning() && !section.text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_vocabularies_are_valid() {
        assert_eq!(Vocabulary::thought_answer().labels().len(), 2);
        assert_eq!(
            Vocabulary::plan_rationale_answer().answer_label().marker,
            "RESPOSTA FINAL:"
        );
    }

    #[test]
    fn rejects_duplicate_markers_ignoring_case() {
        let err = Vocabulary::new(vec![
            Label::new(SectionKind::Thought, "Nota:"),
            Label::new(SectionKind::Answer, "NOTA:"),
        ])
        .expect_err("duplicate");
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_missing_or_multiple_answer_labels() {
        assert!(Vocabulary::new(vec![Label::new(SectionKind::Thought, "A:")]).is_err());
        assert!(
            Vocabulary::new(vec![
                Label::new(SectionKind::Answer, "A:"),
                Label::new(SectionKind::Answer, "B:"),
            ])
            .is_err()
        );
    }

    #[test]
    fn rejects_blank_marker() {
        assert!(Vocabulary::new(vec![Label::new(SectionKind::Answer, "  ")]).is_err());
    }

    #[test]
    fn markers_are_escaped() {
        let vocab = Vocabulary::new(vec![Label::new(SectionKind::Answer, "A.B (x):")])
            .expect("vocab");
        assert!(vocab.occurrences("AxB (x):").is_empty());
        assert_eq!(vocab.occurrences("a.b (X): ok"), vec![(0, 0..8)]);
    }

    #[test]
    fn longer_marker_wins_at_same_position() {
        let vocab = Vocabulary::new(vec![
            Label::new(SectionKind::Thought, "NOTA:"),
            Label::new(SectionKind::Answer, "NOTA: FINAL:"),
        ])
        .expect("vocab");
        let found = vocab.occurrences("nota: final: sim");
        assert_eq!(found, vec![(1, 0..12)]);
    }
}
