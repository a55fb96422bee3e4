/*!
 * Word-count-bounded chunking.
 *
 * Paragraphs are accumulated into a running chunk. Before a paragraph is
 * added, the running chunk is closed if it already holds words and the
 * paragraph would push it past the target. A paragraph is never split, so
 * an oversized paragraph forms a chunk of its own.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::errors::ConfigError;

use super::paragraph::count_words;

/// A group of consecutive paragraphs treated as one translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of the chunk in the document (0-based)
    pub index: usize,

    /// Paragraph texts joined by line breaks
    pub text: String,

    /// Range of source paragraph indices covered by this chunk
    pub paragraphs: Range<usize>,

    /// Total word count of the covered paragraphs
    pub word_count: usize,
}

impl Chunk {
    /// Number of paragraphs in the chunk.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }
}

/// Running state while chunks are assembled.
struct ChunkBuilder {
    start: usize,
    texts: Vec<String>,
    word_count: usize,
}

impl ChunkBuilder {
    fn new(start: usize) -> Self {
        Self {
            start,
            texts: Vec::new(),
            word_count: 0,
        }
    }

    fn push(&mut self, text: &str, words: usize) {
        self.texts.push(text.to_string());
        self.word_count += words;
    }

    fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    fn finish(self, index: usize) -> Chunk {
        let end = self.start + self.texts.len();
        Chunk {
            index,
            text: self.texts.join("\n"),
            paragraphs: self.start..end,
            word_count: self.word_count,
        }
    }
}

/// Partition paragraphs into chunks of roughly `target_words` words.
///
/// Returns `ConfigError::InvalidChunkSize` when `target_words` is zero.
/// An empty paragraph list yields no chunks.
pub fn chunk_paragraphs<S: AsRef<str>>(
    paragraphs: &[S],
    target_words: usize,
) -> Result<Vec<Chunk>, ConfigError> {
    if target_words == 0 {
        return Err(ConfigError::InvalidChunkSize(target_words));
    }

    let mut chunks = Vec::new();
    let mut current = ChunkBuilder::new(0);

    for (position, paragraph) in paragraphs.iter().enumerate() {
        let text = paragraph.as_ref();
        let words = count_words(text);

        if current.word_count > 0 && current.word_count + words > target_words {
            let finished = std::mem::replace(&mut current, ChunkBuilder::new(position));
            chunks.push(finished.finish(chunks.len()));
        }

        current.push(text, words);
    }

    if !current.is_empty() {
        chunks.push(current.finish(chunks.len()));
    }

    if log::max_level() >= log::LevelFilter::Debug {
        for chunk in &chunks {
            debug!(
                "Chunk {}: paragraphs {}..{} ({} words)",
                chunk.index + 1,
                chunk.paragraphs.start,
                chunk.paragraphs.end,
                chunk.word_count
            );
        }
    }

    Ok(chunks)
}
