/*!
 * Common test utilities for the draftwise test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Route library logs through env_logger, once per test binary
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    init_logger();
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Three short paragraphs that split into two chunks at a target of 12 words
pub const LEASE_DOCUMENT: &str = "\
The Lessee shall pay rent monthly.
The Lessor shall repair the roof.
Force majeure excuses late payment.
";

/// Creates the sample lease document in the specified directory
pub fn create_test_document(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, LEASE_DOCUMENT)
}

/// Creates a glossary file in the bracketed format
pub fn create_test_glossary(dir: &Path, filename: &str, entries: &[(&str, &str)]) -> Result<PathBuf> {
    let content: String = entries
        .iter()
        .map(|(source, target)| format!("[{}] - [{}]\n", source, target))
        .collect();
    create_test_file(dir, filename, &content)
}
