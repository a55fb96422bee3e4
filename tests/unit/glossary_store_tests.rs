/*!
 * Tests for the glossary file format and the term store
 */

use anyhow::Result;
use draftwise::glossary::{
    GlossaryEntry, GlossaryStore, TermMap, parse_entries, parse_terms, serialize_terms,
};
use crate::common;

fn terms(pairs: &[(&str, &str)]) -> TermMap {
    pairs
        .iter()
        .map(|(s, t)| (s.to_string(), t.to_string()))
        .collect()
}

/// Both line forms are read; malformed and blank lines are skipped
#[test]
fn test_parseTerms_withMixedLines_shouldKeepValidEntries() {
    let text = "\
[lessee] - [임차인]

lessor - 임대인
no separator here
[ ] - [빈 원문]
 - 빈 원문
force - majeure - 불가항력
";

    let parsed = parse_terms(text);

    assert_eq!(
        parsed,
        terms(&[
            ("lessee", "임차인"),
            ("lessor", "임대인"),
            ("force - majeure", "불가항력"),
        ])
    );
}

/// Later lines replace earlier ones for the same source term
#[test]
fn test_parseTerms_withRepeatedSource_shouldKeepLast() {
    let parsed = parse_terms("[rent] - [임대료]\n[rent] - [차임]\n");
    assert_eq!(parsed.get("rent").map(String::as_str), Some("차임"));
    assert_eq!(parsed.len(), 1);
}

/// Suggestion lists keep their order and duplicates
#[test]
fn test_parseEntries_withDuplicates_shouldKeepEveryLine() {
    let entries = parse_entries("[tenant] - [임차인]\ntenant - 세입자\n");
    assert_eq!(
        entries,
        vec![
            GlossaryEntry::new("tenant", "임차인").unwrap(),
            GlossaryEntry::new("tenant", "세입자").unwrap(),
        ]
    );
}

/// Serialization is sorted and bracketed
#[test]
fn test_serializeTerms_shouldSortBySource() {
    let text = serialize_terms(&terms(&[("rent", "차임"), ("lessee", "임차인")]));
    assert_eq!(text, "[lessee] - [임차인]\n[rent] - [차임]\n");
}

/// Serialized glossaries parse back to the same mapping
#[test]
fn test_serializeThenParse_shouldPreserveMapping() {
    let stored = terms(&[
        ("lessee", "임차인"),
        ("force majeure", "불가항력"),
        ("notice period", "통지 기간"),
        ("A - B clause", "갑을 조항"),
        ("Schedule 1", "별표 1"),
    ]);

    assert_eq!(parse_terms(&serialize_terms(&stored)), stored);
}

/// Entries are trimmed and must not be empty
#[test]
fn test_glossaryEntry_new_shouldTrimAndRejectEmpty() {
    let entry = GlossaryEntry::new("  lessee ", " 임차인\t").unwrap();
    assert_eq!(entry.source, "lessee");
    assert_eq!(entry.target, "임차인");
    assert_eq!(entry.to_line(), "[lessee] - [임차인]");

    assert!(GlossaryEntry::new("   ", "임차인").is_none());
    assert!(GlossaryEntry::new("lessee", "").is_none());
}

/// A missing glossary file is an empty glossary
#[test]
fn test_load_withMissingFile_shouldReturnEmptyStore() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = GlossaryStore::load(temp_dir.path().join("Translation glossary.txt"))?;
    assert!(store.is_empty());
    Ok(())
}

/// Saving writes the sorted bracketed form and loading reads it back
#[test]
fn test_saveThenLoad_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("glossary.txt");

    let mut store = GlossaryStore::from_text("rent - 차임\n");
    store.insert(GlossaryEntry::new("lessee", "임차인").unwrap());
    store.save(&path)?;

    assert_eq!(
        std::fs::read_to_string(&path)?,
        "[lessee] - [임차인]\n[rent] - [차임]\n"
    );
    let loaded = GlossaryStore::load(&path)?;
    assert_eq!(loaded, store);
    assert_eq!(loaded.get("rent"), Some("차임"));
    Ok(())
}
