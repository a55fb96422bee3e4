/*!
 * Tests for the per-chunk workflow state machine
 */

use draftwise::document::{Chunk, chunk_paragraphs};
use draftwise::errors::{InputError, WorkflowError};
use draftwise::prompts::{PromptSet, Stage};
use draftwise::workflow::{
    Direction, Effect, Event, Step, TransitionContext, WorkflowState, transition,
};

fn chunks() -> Vec<Chunk> {
    chunk_paragraphs(
        &["The Lessee shall pay rent.", "The Lessor shall repair.", "Notices in writing."],
        5,
    )
    .unwrap()
}

fn confirm(
    state: WorkflowState,
    draft: Option<&str>,
    ctx: &TransitionContext<'_>,
) -> Result<(WorkflowState, Effect), WorkflowError> {
    transition(state, &Event::Confirm { draft }, ctx)
}

/// A chunk walks through every step in order
#[test]
fn test_transition_fullSequence_shouldReachDone() {
    let chunks = chunks();
    let prompts = PromptSet::default();
    let ctx = TransitionContext { chunks: &chunks, prompts: &prompts };

    let (state, effect) = confirm(WorkflowState::default(), None, &ctx).unwrap();
    assert_eq!(state.step, Step::Refine);
    assert!(matches!(effect, Effect::ShowPrompt { stage: Stage::Draft, .. }));

    let (state, effect) = confirm(state, Some("임차인은 차임을 지급한다."), &ctx).unwrap();
    assert_eq!(state.step, Step::Review);
    match effect {
        Effect::ShowPrompt { stage, prompt } => {
            assert_eq!(stage, Stage::Refine);
            assert!(prompt.contains("The Lessee shall pay rent."));
            assert!(prompt.contains("임차인은 차임을 지급한다."));
        }
        other => panic!("unexpected effect: {:?}", other),
    }

    let (state, effect) = confirm(state, None, &ctx).unwrap();
    assert_eq!(state, WorkflowState { chunk_index: 0, step: Step::Done });
    assert_eq!(effect, Effect::OpenReview { chunk_index: 0 });
}

/// Without a draft the refine step refuses to advance
#[test]
fn test_transition_confirmWithoutDraft_shouldStayAtRefine() {
    let chunks = chunks();
    let prompts = PromptSet::default();
    let ctx = TransitionContext { chunks: &chunks, prompts: &prompts };

    let (state, _) = confirm(WorkflowState::default(), None, &ctx).unwrap();

    assert_eq!(
        confirm(state, None, &ctx),
        Err(WorkflowError::Input(InputError::EmptyDraft))
    );
    assert_eq!(
        confirm(state, Some(""), &ctx),
        Err(WorkflowError::Input(InputError::EmptyDraft))
    );
    assert_eq!(state.step, Step::Refine);

    let (state, _) = confirm(state, Some("초벌 번역"), &ctx).unwrap();
    assert_eq!(state.step, Step::Review);
}

/// Navigating past the last chunk is a reported no-op
#[test]
fn test_transition_nextAtLastChunk_shouldReportBoundary() {
    let chunks = chunks();
    let prompts = PromptSet::default();
    let ctx = TransitionContext { chunks: &chunks, prompts: &prompts };
    let last = WorkflowState { chunk_index: chunks.len() - 1, step: Step::Refine };

    let (state, effect) = transition(last, &Event::Navigate(Direction::Next), &ctx).unwrap();

    assert_eq!(state, last);
    assert_eq!(effect, Effect::BoundaryReached { direction: Direction::Next });
}

/// Navigating restarts the new chunk at the draft step
#[test]
fn test_transition_navigate_shouldResetStep() {
    let chunks = chunks();
    let prompts = PromptSet::default();
    let ctx = TransitionContext { chunks: &chunks, prompts: &prompts };
    let state = WorkflowState { chunk_index: 1, step: Step::Done };

    let (next, effect) = transition(state, &Event::Navigate(Direction::Next), &ctx).unwrap();
    assert_eq!(next, WorkflowState::at_chunk(2));
    assert_eq!(effect, Effect::ChunkChanged { chunk_index: 2 });

    let (back, _) = transition(next, &Event::Navigate(Direction::Previous), &ctx).unwrap();
    assert_eq!(back, WorkflowState { chunk_index: 1, step: Step::Draft });
}

/// Steps describe themselves for the interface
#[test]
fn test_step_labels_shouldFollowOrder() {
    let steps = [Step::Draft, Step::Refine, Step::Review, Step::Done];
    let numbers: Vec<usize> = steps.iter().map(Step::number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert!(Step::Done.is_terminal());
    assert!(!Step::Review.is_terminal());
    assert_eq!(Step::Review.to_string(), "Review");
}
