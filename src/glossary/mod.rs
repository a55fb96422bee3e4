/*!
 * Bilingual glossary management.
 *
 * This module provides:
 * - `store`: the line-oriented glossary format and the owned term mapping
 * - `merge`: conflict-aware merging of suggested terms into the glossary
 * - `discrepancy`: detection of glossary terms missing from a translation
 */

pub mod discrepancy;
pub mod merge;
pub mod store;

// Re-export main types
pub use discrepancy::{Discrepancy, find_discrepancies};
pub use merge::{Conflict, ConflictId, Decision, Decisions, MergePlan, MergeSummary};
pub use store::{GlossaryEntry, GlossaryStore, TermMap, parse_entries, parse_terms, serialize_terms};
