/*!
 * Review output markers.
 *
 * The refinement prompt asks for the improved translation between
 * `---번역문 시작---` and `---번역문 끝---`, followed by the reasons for the
 * changes between `---수정 이유 시작---` and `---수정 이유 끝---`. Answers that
 * ignore the format are used verbatim.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Start marker of the translation section
pub const TRANSLATION_START: &str = "---번역문 시작---";

/// End marker of the translation section
pub const TRANSLATION_END: &str = "---번역문 끝---";

/// Start marker of the rationale section
pub const RATIONALE_START: &str = "---수정 이유 시작---";

/// End marker of the rationale section
pub const RATIONALE_END: &str = "---수정 이유 끝---";

/// Regex for the translation section (dot matches newlines, shortest span)
static TRANSLATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?s){}(.*?){}",
        regex::escape(TRANSLATION_START),
        regex::escape(TRANSLATION_END)
    ))
    .expect("Invalid translation marker regex")
});

/// Regex for the rationale section
static RATIONALE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?s){}(.*?){}",
        regex::escape(RATIONALE_START),
        regex::escape(RATIONALE_END)
    ))
    .expect("Invalid rationale marker regex")
});

/// Text between the translation markers, trimmed; the whole payload otherwise.
pub fn extract_translation(payload: &str) -> &str {
    TRANSLATION_REGEX
        .captures(payload)
        .and_then(|caps| caps.get(1))
        .map_or(payload, |m| m.as_str().trim())
}

/// Text between the rationale markers, trimmed, if present.
pub fn extract_rationale(payload: &str) -> Option<&str> {
    RATIONALE_REGEX
        .captures(payload)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// A refinement answer split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPayload<'a> {
    /// Extracted translation (or the whole payload)
    pub translation: &'a str,
    /// Reasons for the changes, when the answer includes them
    pub rationale: Option<&'a str>,
    /// Whether the translation markers were found
    pub has_markers: bool,
}

impl<'a> ReviewPayload<'a> {
    /// Split a payload.
    pub fn parse(payload: &'a str) -> Self {
        Self {
            translation: extract_translation(payload),
            rationale: extract_rationale(payload),
            has_markers: TRANSLATION_REGEX.is_match(payload),
        }
    }
}
