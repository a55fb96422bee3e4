/*!
 * Error types for the draftwise application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. Every error here is
 * recoverable: the caller decides whether to retry, prompt again or give up.
 */

use thiserror::Error;

use crate::glossary::merge::ConflictId;
use crate::prompts::Stage;
use crate::workflow::Step;

/// Errors in configuration values, reported before any processing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Chunk target word count must be positive
    #[error("Chunk size must be greater than zero (got {0})")]
    InvalidChunkSize(usize),

    /// A prompt template lacks a placeholder its stage requires
    #[error("The {stage} prompt template must contain {placeholder}")]
    MissingPlaceholder {
        /// Stage whose template is invalid
        stage: Stage,
        /// The missing placeholder, braces included
        placeholder: &'static str,
    },

    /// The configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Errors caused by missing or empty user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The loaded document produced no chunks
    #[error("The document contains no paragraphs")]
    EmptyDocument,

    /// Refine step confirmed without a draft translation
    #[error("Enter the draft translation before generating the refinement prompt")]
    EmptyDraft,

    /// Review operation invoked without a translation payload
    #[error("Paste the final translation first")]
    EmptyTranslation,

    /// The payload was non-empty but nothing remained after marker extraction
    #[error("Could not extract a translation from the answer")]
    NoTranslationExtracted,

    /// Term suggestions applied without any text
    #[error("Paste the suggested term list first")]
    EmptySuggestions,
}

/// Errors raised while reconciling term suggestions with the glossary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Not every conflict received a decision; the batch was discarded
    #[error("Merge cancelled: {} conflict(s) left undecided", missing.len())]
    IncompleteDecisions {
        /// Source terms of the undecided conflicts
        missing: Vec<String>,
    },

    /// A decision referred to a conflict that is not part of the plan
    #[error("No conflict with id {0} in this merge")]
    UnknownConflict(ConflictId),

    /// Another merge is still waiting for decisions
    #[error("A glossary merge is already waiting for decisions")]
    MergeInProgress,

    /// Commit requested without a pending merge
    #[error("There is no pending glossary merge")]
    NoPendingMerge,

    /// The same source term was both kept and adopted
    #[error("'{term}' cannot be both kept and adopted")]
    ContradictoryDecision {
        /// Source term named twice
        term: String,
    },
}

/// Errors from driving the per-chunk workflow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// Missing user input; the state did not advance
    #[error(transparent)]
    Input(#[from] InputError),

    /// The current chunk already reached its final step
    #[error("This chunk is complete; move to another chunk to continue")]
    ChunkComplete,

    /// Review operations wait until the refinement step is confirmed
    #[error("Review is not open yet, the chunk is at the {0} step")]
    ReviewNotOpen(Step),

    /// Invalid configuration handed to the workflow
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error in user input
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Error from glossary merging
    #[error("Glossary error: {0}")]
    Merge(#[from] MergeError),

    /// Error from the workflow
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
