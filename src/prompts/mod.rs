/*!
 * Prompt preparation for the external text-generation step.
 *
 * This module provides:
 * - Stage-specific prompt templates with placeholder validation
 * - The default legal-translation templates
 * - Extraction of the translation from a refinement answer
 */

pub mod markers;
pub mod templates;

// Re-export main types
pub use markers::{ReviewPayload, extract_translation};
pub use templates::{PromptSet, PromptTemplate, PromptVars, Stage};
