/*!
 * Tests for missing glossary term detection
 */

use draftwise::glossary::{Discrepancy, TermMap, find_discrepancies};

fn glossary() -> TermMap {
    TermMap::from([
        ("lessee".to_string(), "임차인".to_string()),
        ("rent".to_string(), "차임".to_string()),
        ("deposit".to_string(), "보증금".to_string()),
    ])
}

/// A term in the chunk without its target in the translation is reported
#[test]
fn test_findDiscrepancies_withMissingTarget_shouldReportTerm() {
    let found = find_discrepancies(
        "The Lessee shall pay rent.",
        &TermMap::from([("lessee".to_string(), "임차인".to_string())]),
        "임대인은 월세를 지급한다.",
    );

    assert_eq!(
        found,
        vec![Discrepancy {
            source: "lessee".to_string(),
            target: "임차인".to_string(),
        }]
    );
}

/// Nothing is reported once the target appears
#[test]
fn test_findDiscrepancies_withTargetPresent_shouldReportNothing() {
    let found = find_discrepancies(
        "The Lessee shall pay rent.",
        &TermMap::from([("lessee".to_string(), "임차인".to_string())]),
        "임차인은 차임을 지급한다.",
    );
    assert!(found.is_empty());
}

/// Terms absent from the chunk are never reported
#[test]
fn test_findDiscrepancies_withTermOutsideChunk_shouldIgnoreIt() {
    let found = find_discrepancies("The Lessee shall pay rent.", &glossary(), "");
    let sources: Vec<&str> = found.iter().map(|d| d.source.as_str()).collect();
    assert_eq!(sources, vec!["lessee", "rent"]);
}

/// Source matching respects word boundaries
#[test]
fn test_findDiscrepancies_withTermInsideLongerWord_shouldNotMatch() {
    let found = find_discrepancies("The rental agreement ends.", &glossary(), "임대차 계약이 종료된다.");
    assert!(found.is_empty());
}

/// Target matching is a plain, case-sensitive substring test
#[test]
fn test_findDiscrepancies_withTargetInsideLongerWord_shouldAccept() {
    let terms = TermMap::from([("notice".to_string(), "Notice".to_string())]);

    assert!(find_discrepancies("Give notice.", &terms, "NoticeBoard").is_empty());
    assert_eq!(find_discrepancies("Give notice.", &terms, "notice").len(), 1);
}

/// Discrepancies print as `source (target)`
#[test]
fn test_discrepancy_display_shouldShowBothTerms() {
    let discrepancy = Discrepancy {
        source: "rent".to_string(),
        target: "차임".to_string(),
    };
    assert_eq!(discrepancy.to_string(), "rent (차임)");
}
