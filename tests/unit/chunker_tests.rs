/*!
 * Tests for paragraph chunking
 */

use draftwise::document::{Paragraph, chunk_paragraphs, paragraphs_from_text};
use draftwise::errors::ConfigError;

fn paragraph(words: usize, tag: &str) -> String {
    vec![tag; words].join(" ")
}

/// Joining every chunk gives back the paragraphs in order
#[test]
fn test_chunkParagraphs_withVariedSizes_shouldPartitionExactly() {
    let paragraphs: Vec<String> = [3usize, 7, 1, 12, 0, 4, 4, 9]
        .iter()
        .enumerate()
        .map(|(i, words)| paragraph(*words, &format!("p{}", i)))
        .collect();

    for target in [1, 5, 10, 20, 100] {
        let chunks = chunk_paragraphs(&paragraphs, target).unwrap();

        let rebuilt: Vec<&str> = chunks.iter().flat_map(|c| c.text.split('\n')).collect();
        let expected: Vec<&str> = paragraphs.iter().map(String::as_str).collect();
        assert_eq!(rebuilt, expected, "target {}", target);

        let mut next = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.paragraphs.start, next);
            assert!(chunk.paragraph_count() > 0);
            next = chunk.paragraphs.end;
        }
        assert_eq!(next, paragraphs.len());
    }
}

/// A paragraph longer than the target still forms its own chunk
#[test]
fn test_chunkParagraphs_withOversizedParagraph_shouldKeepItWhole() {
    let paragraphs = vec![paragraph(2, "a"), paragraph(50, "big"), paragraph(2, "b")];

    let chunks = chunk_paragraphs(&paragraphs, 10).unwrap();

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[1].text, paragraphs[1]);
    assert_eq!(chunks[1].word_count, 50);
    assert_eq!(chunks[1].paragraphs, 1..2);
}

/// Reaching the target exactly does not close the chunk early
#[test]
fn test_chunkParagraphs_withExactFit_shouldShareChunk() {
    let paragraphs = vec![paragraph(4, "a"), paragraph(6, "b"), paragraph(1, "c")];

    let chunks = chunk_paragraphs(&paragraphs, 10).unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].paragraphs, 0..2);
    assert_eq!(chunks[0].word_count, 10);
    assert_eq!(chunks[1].text, "c");
}

/// An empty document has no chunks
#[test]
fn test_chunkParagraphs_withNoParagraphs_shouldReturnEmpty() {
    let paragraphs: Vec<String> = Vec::new();
    assert!(chunk_paragraphs(&paragraphs, 400).unwrap().is_empty());
}

/// A zero target is a configuration error
#[test]
fn test_chunkParagraphs_withZeroTarget_shouldFail() {
    assert_eq!(
        chunk_paragraphs(&["words here"], 0),
        Err(ConfigError::InvalidChunkSize(0))
    );
}

/// Parsed paragraphs chunk like plain strings
#[test]
fn test_chunkParagraphs_withParsedParagraphs_shouldUseTheirText() {
    let paragraphs: Vec<Paragraph> = paragraphs_from_text("one two\r\n\r\nthree four five\n");
    assert_eq!(paragraphs.len(), 3);
    assert!(paragraphs[1].is_blank());

    let chunks = chunk_paragraphs(&paragraphs, 3).unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "one two\n");
    assert_eq!(chunks[1].text, "three four five");
}
