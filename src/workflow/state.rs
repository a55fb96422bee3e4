/*!
 * Workflow state machine.
 *
 * Each chunk walks through `Draft -> Refine -> Review -> Done`. Transitions
 * are pure: `transition` takes the current state and an event and returns
 * the next state with a description of what the interface should do. Moving
 * to another chunk always restarts it at `Draft`.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::document::Chunk;
use crate::errors::{InputError, WorkflowError};
use crate::prompts::{PromptSet, Stage};

/// Stage of the current chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Awaiting first-pass generation
    #[default]
    Draft,
    /// Awaiting the improvement pass; needs a draft translation
    Refine,
    /// Awaiting human review and glossary reconciliation
    Review,
    /// Finished for this visit
    Done,
}

impl Step {
    /// 1-based position of the step.
    pub fn number(&self) -> usize {
        match self {
            Self::Draft => 1,
            Self::Refine => 2,
            Self::Review => 3,
            Self::Done => 4,
        }
    }

    /// Label describing what confirming this step does.
    pub fn action_label(&self) -> &'static str {
        match self {
            Self::Draft => "Generate draft translation prompt",
            Self::Refine => "Generate refinement prompt",
            Self::Review => "Review translation and glossary",
            Self::Done => "Completed",
        }
    }

    /// Whether the step accepts a confirmation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Draft => "Draft",
            Self::Refine => "Refine",
            Self::Review => "Review",
            Self::Done => "Done",
        };
        f.write_str(name)
    }
}

/// Current chunk and step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkflowState {
    /// 0-based chunk index
    pub chunk_index: usize,
    /// Step within the chunk
    pub step: Step,
}

impl WorkflowState {
    /// State on entry to a chunk.
    pub fn at_chunk(chunk_index: usize) -> Self {
        Self {
            chunk_index,
            step: Step::Draft,
        }
    }
}

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the first chunk
    Previous,
    /// Towards the last chunk
    Next,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Previous => f.write_str("previous"),
            Self::Next => f.write_str("next"),
        }
    }
}

/// Input delivered by the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// Confirm the current step; `draft` is required at `Refine`
    Confirm {
        /// Draft translation supplied by the translator
        draft: Option<&'a str>,
    },
    /// Move one chunk back or forward
    Navigate(Direction),
}

/// What the interface should do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Display a rendered prompt
    ShowPrompt {
        /// Stage the prompt belongs to
        stage: Stage,
        /// Rendered prompt text
        prompt: String,
    },
    /// Open the review and glossary-reconciliation interaction
    OpenReview {
        /// Chunk under review
        chunk_index: usize,
    },
    /// Another chunk became current; clear prompt and draft inputs
    ChunkChanged {
        /// Newly current chunk
        chunk_index: usize,
    },
    /// Navigation stopped at the first or last chunk; nothing changed
    BoundaryReached {
        /// Requested direction
        direction: Direction,
    },
}

/// Read-only data a transition needs.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    /// Chunks of the loaded document
    pub chunks: &'a [Chunk],
    /// Templates for rendering prompts
    pub prompts: &'a PromptSet,
}

/// Apply an event to a state.
///
/// Errors leave the caller's state untouched (it is passed by value and
/// only replaced on success).
pub fn transition(
    state: WorkflowState,
    event: &Event<'_>,
    ctx: &TransitionContext<'_>,
) -> Result<(WorkflowState, Effect), WorkflowError> {
    match event {
        Event::Navigate(direction) => Ok(navigate(state, *direction, ctx.chunks.len())),
        Event::Confirm { draft } => confirm(state, *draft, ctx),
    }
}

fn navigate(state: WorkflowState, direction: Direction, chunk_count: usize) -> (WorkflowState, Effect) {
    let target = match direction {
        Direction::Previous => state.chunk_index.checked_sub(1),
        Direction::Next => state
            .chunk_index
            .checked_add(1)
            .filter(|index| *index < chunk_count),
    };

    match target {
        Some(chunk_index) => (
            WorkflowState::at_chunk(chunk_index),
            Effect::ChunkChanged { chunk_index },
        ),
        None => (state, Effect::BoundaryReached { direction }),
    }
}

fn confirm(
    state: WorkflowState,
    draft: Option<&str>,
    ctx: &TransitionContext<'_>,
) -> Result<(WorkflowState, Effect), WorkflowError> {
    let chunk = ctx
        .chunks
        .get(state.chunk_index)
        .ok_or(InputError::EmptyDocument)?;

    match state.step {
        Step::Draft => {
            let prompt = ctx.prompts.draft_prompt(&chunk.text);
            Ok((
                WorkflowState { step: Step::Refine, ..state },
                Effect::ShowPrompt { stage: Stage::Draft, prompt },
            ))
        }
        Step::Refine => {
            let draft = draft.map(str::trim).unwrap_or_default();
            if draft.is_empty() {
                return Err(InputError::EmptyDraft.into());
            }
            let prompt = ctx.prompts.refine_prompt(&chunk.text, draft);
            Ok((
                WorkflowState { step: Step::Review, ..state },
                Effect::ShowPrompt { stage: Stage::Refine, prompt },
            ))
        }
        Step::Review => Ok((
            WorkflowState { step: Step::Done, ..state },
            Effect::OpenReview { chunk_index: state.chunk_index },
        )),
        Step::Done => Err(WorkflowError::ChunkComplete),
    }
}
