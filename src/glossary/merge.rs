/*!
 * Conflict-aware merging of suggested terms.
 *
 * Merging happens in two phases. `MergePlan::plan` compares proposed
 * entries with the existing mapping and sorts them into additions and
 * conflicts without touching anything. `MergePlan::resolve` then builds the
 * merged mapping, but only once every conflict carries a decision; an
 * incomplete decision set cancels the whole batch.
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::errors::MergeError;

use super::store::{GlossaryEntry, TermMap};

/// Identifier of a conflict within one merge plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConflictId(pub usize);

impl fmt::Display for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 + 1)
    }
}

/// How a conflict should be settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    /// Keep the target term already in the glossary
    KeepExisting,
    /// Replace it with the proposed target term
    #[default]
    AdoptProposed,
}

impl Decision {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::KeepExisting => "keep existing",
            Self::AdoptProposed => "adopt proposed",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Decision {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "keep" | "keep-existing" | "k" => Ok(Self::KeepExisting),
            "adopt" | "adopt-proposed" | "a" => Ok(Self::AdoptProposed),
            _ => Err(anyhow::anyhow!("Invalid decision: {}", s)),
        }
    }
}

/// A proposed entry that disagrees with the stored target term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Identifier used by decisions
    pub id: ConflictId,
    /// Source term shared by both mappings
    pub source: String,
    /// Target term currently stored
    pub existing: String,
    /// Target term suggested
    pub proposed: String,
}

/// Caller-supplied decisions, keyed by conflict id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decisions(BTreeMap<ConflictId, Decision>);

impl Decisions {
    /// No decisions yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The same decision for every conflict of a plan.
    pub fn all(plan: &MergePlan, decision: Decision) -> Self {
        Self(plan.conflicts.iter().map(|c| (c.id, decision)).collect())
    }

    /// Record or replace a decision.
    pub fn set(&mut self, id: ConflictId, decision: Decision) {
        self.0.insert(id, decision);
    }

    /// Decision for a conflict, if any.
    pub fn get(&self, id: ConflictId) -> Option<Decision> {
        self.0.get(&id).copied()
    }

    /// Number of recorded decisions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no decision was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn ids(&self) -> impl Iterator<Item = ConflictId> + '_ {
        self.0.keys().copied()
    }
}

/// Counts describing an applied merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    /// New source terms added
    pub added: usize,
    /// Conflicts settled by adopting the proposal
    pub updated: usize,
    /// Conflicts settled by keeping the stored term
    pub kept: usize,
}

impl MergeSummary {
    /// Whether the merge changed the glossary.
    pub fn changed(&self) -> bool {
        self.added > 0 || self.updated > 0
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.changed() {
            return f.write_str("No terms to add or update");
        }
        let mut parts = Vec::new();
        if self.added > 0 {
            parts.push(format!("added {} new term(s)", self.added));
        }
        if self.updated > 0 {
            parts.push(format!("updated {} existing term(s)", self.updated));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Result of comparing proposed entries with the existing mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// Proposed entries whose source term is not stored yet
    pub additions: TermMap,
    /// Proposed entries that disagree with the stored target term
    pub conflicts: Vec<Conflict>,
}

impl MergePlan {
    /// Sort proposals into additions and conflicts.
    ///
    /// Proposals are deduplicated by source term, first occurrence wins.
    /// A proposal equal to the stored mapping is neither.
    pub fn plan(existing: &TermMap, proposed: impl IntoIterator<Item = GlossaryEntry>) -> Self {
        let mut seen = HashSet::new();
        let mut plan = Self::default();

        for entry in proposed {
            if !seen.insert(entry.source.clone()) {
                debug!("Ignoring repeated suggestion for '{}'", entry.source);
                continue;
            }

            match existing.get(&entry.source) {
                None => {
                    plan.additions.insert(entry.source, entry.target);
                }
                Some(current) if *current == entry.target => {}
                Some(current) => {
                    let id = ConflictId(plan.conflicts.len());
                    plan.conflicts.push(Conflict {
                        id,
                        existing: current.clone(),
                        source: entry.source,
                        proposed: entry.target,
                    });
                }
            }
        }

        debug!(
            "Merge plan: {} addition(s), {} conflict(s)",
            plan.additions.len(),
            plan.conflicts.len()
        );
        plan
    }

    /// Whether the plan neither adds nor conflicts.
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.conflicts.is_empty()
    }

    /// Whether decisions are needed before resolving.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Find the conflict for a source term.
    pub fn conflict_for(&self, source: &str) -> Option<&Conflict> {
        self.conflicts.iter().find(|c| c.source == source)
    }

    /// Decisions to present before confirmation: `default` for every conflict.
    ///
    /// These are never applied on their own; the caller must pass them back
    /// to `resolve` after confirmation.
    pub fn provisional_decisions(&self, default: Decision) -> Decisions {
        Decisions::all(self, default)
    }

    /// Build the merged mapping: `existing` plus additions, then each conflict
    /// settled by its decision.
    ///
    /// Fails without producing anything if a decision is missing or refers to
    /// an unknown conflict.
    pub fn resolve(
        &self,
        existing: &TermMap,
        decisions: &Decisions,
    ) -> Result<(TermMap, MergeSummary), MergeError> {
        if let Some(unknown) = decisions.ids().find(|id| id.0 >= self.conflicts.len()) {
            return Err(MergeError::UnknownConflict(unknown));
        }

        let missing: Vec<String> = self
            .conflicts
            .iter()
            .filter(|c| decisions.get(c.id).is_none())
            .map(|c| c.source.clone())
            .collect();
        if !missing.is_empty() {
            info!("Glossary merge cancelled, {} conflict(s) undecided", missing.len());
            return Err(MergeError::IncompleteDecisions { missing });
        }

        let mut merged = existing.clone();
        let mut summary = MergeSummary::default();

        for (source, target) in &self.additions {
            merged.insert(source.clone(), target.clone());
            summary.added += 1;
        }

        for conflict in &self.conflicts {
            match decisions.get(conflict.id) {
                Some(Decision::AdoptProposed) => {
                    merged.insert(conflict.source.clone(), conflict.proposed.clone());
                    summary.updated += 1;
                }
                Some(Decision::KeepExisting) | None => summary.kept += 1,
            }
        }

        Ok((merged, summary))
    }
}
