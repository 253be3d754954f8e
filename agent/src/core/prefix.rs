//! Strip boilerplate answer prefixes the model sometimes echoes back.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Known prefixes, matched case-insensitively at the start of the text.
pub const KNOWN_PREFIXES: &[&str] = &["RESPOSTA FINAL:", "RESPOSTA:", "FINAL ANSWER:", "ANSWER:"];

static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = KNOWN_PREFIXES.iter().map(|p| regex::escape(p)).collect();
    Regex::new(&format!("^(?i:{})", alternatives.join("|"))).expect("prefix regex should compile")
});

/// Remove every leading known prefix (repeatedly, trimming in between).
///
/// Returns `text` untouched, borrowed, when no prefix matched. Applying it
/// twice gives the same result as applying it once.
pub fn strip_known_prefixes(text: &str) -> Cow<'_, str> {
    let mut rest = text.trim();
    let mut stripped = false;
    while let Some(found) = PREFIX_RE.find(rest) {
        rest = rest[found.end()..].trim();
        stripped = true;
    }
    if stripped {
        Cow::Owned(rest.to_string())
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_final_answer_prefix() {
        assert_eq!(strip_known_prefixes("RESPOSTA FINAL: São 10:30 AM"), "São 10:30 AM");
    }

    #[test]
    fn strips_case_variants_and_english_prefixes() {
        assert_eq!(strip_known_prefixes("Resposta: sim"), "sim");
        assert_eq!(strip_known_prefixes("  final answer:\n42 "), "42");
        assert_eq!(strip_known_prefixes("Answer: yes"), "yes");
    }

    #[test]
    fn unmatched_text_is_returned_unchanged() {
        let text = "  Nada a remover.  ";
        let result = strip_known_prefixes(text);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, text);
    }

    #[test]
    fn prefix_in_the_middle_is_kept() {
        assert!(matches!(
            strip_known_prefixes("A RESPOSTA: talvez"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn stacked_prefixes_are_all_removed() {
        assert_eq!(strip_known_prefixes("RESPOSTA: RESPOSTA FINAL: ok"), "ok");
    }

    #[test]
    fn stripping_is_idempotent() {
        for text in [
            "RESPOSTA FINAL: São 10:30 AM",
            "answer: RESPOSTA: x",
            "RESPOSTA:",
            "plain text",
            "",
        ] {
            let once = strip_known_prefixes(text).into_owned();
            let twice = strip_known_prefixes(&once).into_owned();
            assert_eq!(once, twice, "input {text:?}");
        }
    }
}
