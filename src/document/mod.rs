/*!
 * Source document model.
 *
 * A document arrives as an ordered list of paragraph texts. This module
 * counts their words and groups them into bounded translation chunks:
 *
 * - `paragraph`: paragraph extraction and word counting
 * - `chunker`: word-count-bounded chunking that never splits a paragraph
 */

pub mod chunker;
pub mod paragraph;

// Re-export main types
pub use chunker::{Chunk, chunk_paragraphs};
pub use paragraph::{Paragraph, count_words, paragraphs_from_text};
