/*!
 * Translation session context.
 *
 * A session is created when a document and its glossary are loaded and is
 * dropped on unload or reload. It owns:
 * - the chunk sequence (read-only after loading)
 * - the glossary store (the single mutable term mapping)
 * - the workflow state of the current chunk
 * - at most one glossary merge waiting for decisions
 */

use log::{debug, info, warn};

use crate::document::{Chunk, chunk_paragraphs};
use crate::errors::{AppError, InputError, MergeError, WorkflowError};
use crate::glossary::{
    Conflict, Decision, Decisions, Discrepancy, GlossaryStore, MergePlan, MergeSummary,
    find_discrepancies, parse_entries,
};
use crate::prompts::{PromptSet, extract_translation};

use super::state::{Direction, Effect, Event, Step, TransitionContext, WorkflowState, transition};

/// Settings a session is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Target words per chunk
    pub chunk_size: usize,
    /// Validated prompt templates
    pub prompts: PromptSet,
    /// Decision pre-selected for each conflict before confirmation
    pub default_decision: Decision,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            chunk_size: crate::app_config::DEFAULT_CHUNK_SIZE,
            prompts: PromptSet::default(),
            default_decision: Decision::default(),
        }
    }
}

/// Outcome of handing term suggestions to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermProposal {
    /// No conflicts: the additions were applied right away
    Applied(MergeSummary),
    /// Conflicts need decisions; the plan is pending in the session
    AwaitingDecisions {
        /// Number of additions held with the conflicts
        additions: usize,
        /// Conflicts to decide
        conflicts: Vec<Conflict>,
        /// Pre-selected decisions to present, never applied on their own
        provisional: Decisions,
    },
    /// Every suggestion already matches the glossary
    NothingToDo,
}

/// A loaded document with its glossary and workflow position.
#[derive(Debug)]
pub struct Session {
    settings: SessionSettings,
    chunks: Vec<Chunk>,
    glossary: GlossaryStore,
    state: WorkflowState,
    pending_merge: Option<MergePlan>,
    glossary_dirty: bool,
}

impl Session {
    /// Chunk the paragraphs and start at the first chunk.
    pub fn load<S: AsRef<str>>(
        paragraphs: &[S],
        glossary: GlossaryStore,
        settings: SessionSettings,
    ) -> Result<Self, WorkflowError> {
        let chunks = chunk_paragraphs(paragraphs, settings.chunk_size)?;
        if chunks.is_empty() {
            return Err(InputError::EmptyDocument.into());
        }

        info!(
            "Loaded {} chunk(s) and {} glossary term(s)",
            chunks.len(),
            glossary.len()
        );

        Ok(Self {
            settings,
            chunks,
            glossary,
            state: WorkflowState::default(),
            pending_merge: None,
            glossary_dirty: false,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current workflow state.
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Current step.
    pub fn step(&self) -> Step {
        self.state.step
    }

    /// All chunks.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The chunk being worked on.
    pub fn current_chunk(&self) -> &Chunk {
        // chunk_index is kept within bounds by `load` and `transition`
        &self.chunks[self.state.chunk_index]
    }

    /// Session settings.
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// The glossary store.
    pub fn glossary(&self) -> &GlossaryStore {
        &self.glossary
    }

    /// Whether the glossary changed since loading or the last `mark_saved`.
    pub fn is_glossary_dirty(&self) -> bool {
        self.glossary_dirty
    }

    /// Record that the glossary was written out.
    pub fn mark_saved(&mut self) {
        self.glossary_dirty = false;
    }

    /// Whether a previous chunk exists.
    pub fn can_go_previous(&self) -> bool {
        self.state.chunk_index > 0
    }

    /// Whether a next chunk exists.
    pub fn can_go_next(&self) -> bool {
        self.state.chunk_index + 1 < self.chunks.len()
    }

    /// `Chunk <n>/<total> - [<step>]`
    pub fn progress_label(&self) -> String {
        format!(
            "Chunk {}/{} - [{}]",
            self.state.chunk_index + 1,
            self.chunks.len(),
            self.state.step
        )
    }

    // =========================================================================
    // Workflow
    // =========================================================================

    /// Deliver an event to the state machine. The state only changes on success.
    pub fn handle(&mut self, event: &Event<'_>) -> Result<Effect, WorkflowError> {
        let ctx = TransitionContext {
            chunks: &self.chunks,
            prompts: &self.settings.prompts,
        };
        let (next, effect) = transition(self.state, event, &ctx)?;

        if next.chunk_index != self.state.chunk_index && self.pending_merge.take().is_some() {
            info!("Pending glossary merge discarded on chunk change");
        }
        if let Effect::BoundaryReached { direction } = &effect {
            warn!("Already at the {} end of the document", boundary_name(*direction));
        }

        debug!("Workflow: {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(effect)
    }

    /// Confirm the current step.
    pub fn confirm(&mut self, draft: Option<&str>) -> Result<Effect, WorkflowError> {
        self.handle(&Event::Confirm { draft })
    }

    /// Move one chunk back or forward.
    pub fn navigate(&mut self, direction: Direction) -> Result<Effect, WorkflowError> {
        self.handle(&Event::Navigate(direction))
    }

    // =========================================================================
    // Review
    // =========================================================================

    /// Whether the review operations are available for the current chunk.
    ///
    /// Review opens once the refinement is confirmed and stays open until
    /// the chunk changes.
    pub fn is_review_open(&self) -> bool {
        matches!(self.state.step, Step::Review | Step::Done)
    }

    /// Fail unless the review operations are available.
    pub fn ensure_review_open(&self) -> Result<(), WorkflowError> {
        if self.is_review_open() {
            Ok(())
        } else {
            Err(WorkflowError::ReviewNotOpen(self.state.step))
        }
    }

    /// Glossary terms of the current chunk missing from the translation.
    pub fn check_discrepancies(&self, payload: &str) -> Result<Vec<Discrepancy>, WorkflowError> {
        self.ensure_review_open()?;
        let found = chunk_discrepancies(self.current_chunk(), &self.glossary, payload)?;
        debug!("Discrepancy check found {} missing term(s)", found.len());
        Ok(found)
    }

    /// Render the term-suggestion prompt for the current chunk.
    pub fn suggestion_prompt(&self, payload: &str) -> Result<String, WorkflowError> {
        self.ensure_review_open()?;
        Ok(chunk_suggestion_prompt(
            &self.settings.prompts,
            self.current_chunk(),
            payload,
        )?)
    }

    /// Plan a merge of suggested terms.
    ///
    /// Without conflicts the additions are applied immediately. With
    /// conflicts the plan waits in the session for `commit_merge` or
    /// `cancel_merge`.
    pub fn propose_terms(&mut self, suggestions: &str) -> Result<TermProposal, AppError> {
        self.ensure_review_open()?;
        if suggestions.trim().is_empty() {
            return Err(InputError::EmptySuggestions.into());
        }
        if self.pending_merge.is_some() {
            return Err(MergeError::MergeInProgress.into());
        }

        let plan = self.glossary.plan_merge(parse_entries(suggestions));
        if plan.is_empty() {
            return Ok(TermProposal::NothingToDo);
        }

        if !plan.has_conflicts() {
            let summary = self.glossary.apply_merge(&plan, &Decisions::new())?;
            self.glossary_dirty = true;
            info!("Glossary updated: {}", summary);
            return Ok(TermProposal::Applied(summary));
        }

        let proposal = TermProposal::AwaitingDecisions {
            additions: plan.additions.len(),
            conflicts: plan.conflicts.clone(),
            provisional: plan.provisional_decisions(self.settings.default_decision),
        };
        self.pending_merge = Some(plan);
        Ok(proposal)
    }

    /// The merge waiting for decisions, if any.
    pub fn pending_merge(&self) -> Option<&MergePlan> {
        self.pending_merge.as_ref()
    }

    /// Apply the pending merge with the given decisions.
    ///
    /// The pending merge is consumed either way: incomplete decisions cancel
    /// the whole batch and leave the glossary untouched.
    pub fn commit_merge(&mut self, decisions: &Decisions) -> Result<MergeSummary, MergeError> {
        let plan = self.pending_merge.take().ok_or(MergeError::NoPendingMerge)?;
        let summary = self.glossary.apply_merge(&plan, decisions)?;
        if summary.changed() {
            self.glossary_dirty = true;
        }
        info!("Glossary updated: {}", summary);
        Ok(summary)
    }

    /// Discard the pending merge. Returns whether one was pending.
    pub fn cancel_merge(&mut self) -> bool {
        let cancelled = self.pending_merge.take().is_some();
        if cancelled {
            info!("Glossary merge cancelled");
        }
        cancelled
    }
}

/// Glossary terms of `chunk` whose target is missing from a translation
/// payload. The text between the translation markers is checked when they
/// are present.
pub fn chunk_discrepancies(
    chunk: &Chunk,
    glossary: &GlossaryStore,
    payload: &str,
) -> Result<Vec<Discrepancy>, InputError> {
    if payload.trim().is_empty() {
        return Err(InputError::EmptyTranslation);
    }
    let translation = extract_translation(payload);
    Ok(find_discrepancies(&chunk.text, glossary.terms(), translation))
}

/// Render the term-suggestion prompt of `chunk` for a final translation.
pub fn chunk_suggestion_prompt(
    prompts: &PromptSet,
    chunk: &Chunk,
    payload: &str,
) -> Result<String, InputError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(InputError::EmptyTranslation);
    }
    let translation = extract_translation(payload);
    if translation.is_empty() {
        return Err(InputError::NoTranslationExtracted);
    }
    Ok(prompts.suggestion_prompt(&chunk.text, translation))
}

fn boundary_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Previous => "first",
        Direction::Next => "last",
    }
}
