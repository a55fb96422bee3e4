/*!
 * Per-chunk translation workflow.
 *
 * This module contains:
 * - `state`: the pure state machine sequencing draft, refine, review and done
 * - `session`: the context that owns chunks, glossary and workflow state and
 *   runs the review operations
 */

pub mod session;
pub mod state;

// Re-export main types
pub use session::{
    Session, SessionSettings, TermProposal, chunk_discrepancies, chunk_suggestion_prompt,
};
pub use state::{Direction, Effect, Event, Step, TransitionContext, WorkflowState, transition};
