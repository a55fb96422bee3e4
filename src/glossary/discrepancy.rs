/*!
 * Glossary discrepancy checking.
 *
 * A glossary term is a discrepancy when its source term occurs in the chunk
 * as a whole word (case-insensitive) while its target term does not occur in
 * the translation (plain, case-sensitive substring). The check is advisory
 * and never blocks the workflow.
 */

use log::warn;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::store::TermMap;

/// A glossary term whose target rendering is missing from the translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// Source term found in the chunk
    pub source: String,
    /// Expected target term
    pub target: String,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.source, self.target)
    }
}

/// Build a case-insensitive whole-word matcher for a source term.
fn whole_word_matcher(term: &str) -> Option<Regex> {
    let pattern = format!(r"\b{}\b", regex::escape(term));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!("Cannot build matcher for glossary term '{}': {}", term, e);
            None
        }
    }
}

/// Whether `term` occurs in `text` as a whole word, ignoring case.
pub fn contains_whole_word(text: &str, term: &str) -> bool {
    whole_word_matcher(term).is_some_and(|regex| regex.is_match(text))
}

/// List glossary entries present in `chunk_text` but missing from `translation`.
///
/// Results follow the glossary's source-term order.
pub fn find_discrepancies(chunk_text: &str, terms: &TermMap, translation: &str) -> Vec<Discrepancy> {
    terms
        .iter()
        .filter(|(source, target)| {
            contains_whole_word(chunk_text, source) && !translation.contains(target.as_str())
        })
        .map(|(source, target)| Discrepancy {
            source: source.clone(),
            target: target.clone(),
        })
        .collect()
}
