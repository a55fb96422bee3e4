/*!
 * Glossary file format and the owned term store.
 *
 * Each non-blank line is offered to an ordered list of line strategies and
 * the first one that recognises the line decides its fate:
 *
 * 1. `[source] - [target]` (bracketed form, interior whitespace trimmed)
 * 2. `source - target`, split at the last ` - `
 *
 * Lines no strategy recognises are skipped. The writer always emits the
 * bracketed form, sorted by source term.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::MergeError;
use crate::file_utils::FileManager;

use super::merge::{Decisions, MergePlan, MergeSummary};

/// Term mapping keyed by source term, iterated in ascending source order.
pub type TermMap = BTreeMap<String, String>;

/// Regex for the bracketed line form
static BRACKETED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(.*?)\]\s*-\s*\[(.*?)\]").expect("Invalid bracketed glossary regex")
});

/// Separator used by the fallback line form
const FALLBACK_SEPARATOR: &str = " - ";

/// A single source/target term pair, both trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlossaryEntry {
    /// Source-language term
    pub source: String,
    /// Target-language term
    pub target: String,
}

impl GlossaryEntry {
    /// Create an entry, trimming both sides. Returns `None` if either side is empty.
    pub fn new(source: &str, target: &str) -> Option<Self> {
        let source = source.trim();
        let target = target.trim();
        if source.is_empty() || target.is_empty() {
            return None;
        }
        Some(Self {
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    /// Render the entry in bracketed form.
    pub fn to_line(&self) -> String {
        format!("[{}] - [{}]", self.source, self.target)
    }
}

/// Outcome of offering a line to a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineParse {
    /// The strategy recognised the line and produced an entry
    Entry(GlossaryEntry),
    /// The strategy recognised the line but one side was empty
    Rejected,
    /// The strategy does not apply; try the next one
    NoMatch,
}

/// One way of reading a glossary line.
pub trait LineStrategy: Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Try to read a trimmed, non-blank line
    fn parse_line(&self, line: &str) -> LineParse;
}

/// `[source] - [target]`
pub struct BracketedStrategy;

impl LineStrategy for BracketedStrategy {
    fn name(&self) -> &'static str {
        "bracketed"
    }

    fn parse_line(&self, line: &str) -> LineParse {
        let Some(caps) = BRACKETED_REGEX.captures(line) else {
            return LineParse::NoMatch;
        };
        let source = caps.get(1).map_or("", |m| m.as_str());
        let target = caps.get(2).map_or("", |m| m.as_str());
        match GlossaryEntry::new(source, target) {
            Some(entry) => LineParse::Entry(entry),
            None => LineParse::Rejected,
        }
    }
}

/// `source - target`, split at the last separator
pub struct SeparatorStrategy;

impl LineStrategy for SeparatorStrategy {
    fn name(&self) -> &'static str {
        "separator"
    }

    fn parse_line(&self, line: &str) -> LineParse {
        let Some((source, target)) = line.rsplit_once(FALLBACK_SEPARATOR) else {
            return LineParse::NoMatch;
        };
        match GlossaryEntry::new(source, target) {
            Some(entry) => LineParse::Entry(entry),
            None => LineParse::Rejected,
        }
    }
}

/// Strategies in precedence order.
pub static LINE_STRATEGIES: [&dyn LineStrategy; 2] = [&BracketedStrategy, &SeparatorStrategy];

/// Read one line with the ordered strategies. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<GlossaryEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    for strategy in LINE_STRATEGIES.iter() {
        match strategy.parse_line(line) {
            LineParse::Entry(entry) => return Some(entry),
            LineParse::Rejected => {
                debug!("Skipping glossary line with an empty side ({}): {}", strategy.name(), line);
                return None;
            }
            LineParse::NoMatch => continue,
        }
    }

    debug!("Skipping unrecognised glossary line: {}", line);
    None
}

/// Parse every recognisable line, in order, keeping duplicates.
///
/// Used for term suggestions, where the first occurrence of a source term matters.
pub fn parse_entries(text: &str) -> Vec<GlossaryEntry> {
    text.lines().filter_map(parse_line).collect()
}

/// Parse a glossary file into a term map. A later line overrides an earlier one.
pub fn parse_terms(text: &str) -> TermMap {
    parse_entries(text)
        .into_iter()
        .map(|entry| (entry.source, entry.target))
        .collect()
}

/// Serialize a term map, one bracketed line per entry in source order.
pub fn serialize_terms(terms: &TermMap) -> String {
    let mut out = String::new();
    for (source, target) in terms {
        out.push('[');
        out.push_str(source);
        out.push_str("] - [");
        out.push_str(target);
        out.push_str("]\n");
    }
    out
}

/// The session's single mutable source of truth for term mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlossaryStore {
    terms: TermMap,
}

impl GlossaryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an existing mapping.
    pub fn from_terms(terms: TermMap) -> Self {
        Self { terms }
    }

    /// Parse glossary text into a store.
    pub fn from_text(text: &str) -> Self {
        Self::from_terms(parse_terms(text))
    }

    /// Load a glossary file. A missing file is an empty glossary.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            info!("Glossary file {:?} not found, starting with an empty glossary", path);
            return Ok(Self::new());
        }

        let content = FileManager::read_to_string(path)
            .with_context(|| format!("Failed to load glossary: {:?}", path))?;
        let store = Self::from_text(&content);
        info!("Loaded {} glossary terms from {:?}", store.len(), path);
        Ok(store)
    }

    /// Write the glossary in bracketed, sorted form.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        FileManager::write_atomically(path, &self.to_text())
            .with_context(|| format!("Failed to save glossary: {:?}", path))?;
        info!("Saved {} glossary terms to {:?}", self.len(), path);
        Ok(())
    }

    /// Serialize the store.
    pub fn to_text(&self) -> String {
        serialize_terms(&self.terms)
    }

    /// Borrow the term mapping.
    pub fn terms(&self) -> &TermMap {
        &self.terms
    }

    /// Look up the target term for a source term.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.terms.get(source).map(String::as_str)
    }

    /// Insert or replace an entry, returning the previous target.
    pub fn insert(&mut self, entry: GlossaryEntry) -> Option<String> {
        self.terms.insert(entry.source, entry.target)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Plan a merge of proposed entries against this store.
    pub fn plan_merge(&self, proposed: impl IntoIterator<Item = GlossaryEntry>) -> MergePlan {
        MergePlan::plan(&self.terms, proposed)
    }

    /// Apply a merge plan. Either every conflict is decided and the store is
    /// replaced by the merged mapping, or nothing changes.
    pub fn apply_merge(
        &mut self,
        plan: &MergePlan,
        decisions: &Decisions,
    ) -> Result<MergeSummary, MergeError> {
        let (terms, summary) = plan.resolve(&self.terms, decisions)?;
        self.terms = terms;
        Ok(summary)
    }
}
