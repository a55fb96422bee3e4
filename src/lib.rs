/*!
 * # Draftwise - chunked, glossary-aware translation drafting
 *
 * A Rust library for driving a human-in-the-loop translation of long
 * documents with an external language model.
 *
 * ## Features
 *
 * - Split a document into chunks of roughly a target word count, never
 *   breaking a paragraph
 * - Render the prompts of each stage of a chunk:
 *   - Draft (first-pass translation)
 *   - Refine (improvement of a pasted draft)
 *   - Suggestion (term extraction from the final translation)
 * - Keep a persistent source-to-target term glossary
 * - Merge suggested terms with explicit conflict decisions
 * - Report glossary terms missing from a translation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `document`: Paragraph extraction and chunking
 * - `glossary`: Term glossary handling:
 *   - `glossary::store`: Glossary file format and the term store
 *   - `glossary::merge`: Conflict-aware merging of suggested terms
 *   - `glossary::discrepancy`: Missing-term detection
 * - `prompts`: Prompt templates and review output markers
 * - `workflow`: Per-chunk state machine and the session context
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: Command and interactive-session driver
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod glossary;
pub mod prompts;
pub mod workflow;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use document::{Chunk, Paragraph, chunk_paragraphs};
pub use errors::{AppError, ConfigError, InputError, MergeError, WorkflowError};
pub use glossary::{Decision, Decisions, GlossaryStore, MergePlan, find_discrepancies};
pub use prompts::{PromptSet, Stage, extract_translation};
pub use workflow::{Session, SessionSettings, Step};
