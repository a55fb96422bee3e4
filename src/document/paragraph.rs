/*!
 * Paragraph extraction and word counting.
 */

use serde::{Deserialize, Serialize};

/// An ordered text unit of the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Raw paragraph text, unmodified
    pub text: String,

    /// Number of whitespace-delimited tokens in `text`
    pub word_count: usize,
}

impl Paragraph {
    /// Create a paragraph and count its words.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let word_count = count_words(&text);
        Self { text, word_count }
    }

    /// Whether the paragraph has no words (blank lines keep their place).
    pub fn is_blank(&self) -> bool {
        self.word_count == 0
    }
}

impl AsRef<str> for Paragraph {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Count whitespace-delimited tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split plain text into paragraphs, one per line.
///
/// Blank lines are kept as zero-word paragraphs so the document layout
/// survives chunking. A trailing line break does not add an empty paragraph.
pub fn paragraphs_from_text(content: &str) -> Vec<Paragraph> {
    content
        .lines()
        .map(|line| Paragraph::new(line.trim_end_matches('\r')))
        .collect()
}
