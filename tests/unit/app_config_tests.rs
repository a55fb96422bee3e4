/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use draftwise::app_config::{Config, DEFAULT_CHUNK_SIZE, DEFAULT_GLOSSARY_FILE_NAME, LogLevel};
use draftwise::errors::ConfigError;
use draftwise::glossary::Decision;
use draftwise::prompts::Stage;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    assert_eq!(config.chunk_size, 400);
    assert_eq!(config.glossary.file_name, DEFAULT_GLOSSARY_FILE_NAME);
    assert_eq!(config.glossary.default_decision, Decision::AdoptProposed);
    assert_eq!(config.prompts.draft, Stage::Draft.default_template());
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.chunk_size = 0;
    assert_eq!(config.validate(), Err(ConfigError::InvalidChunkSize(0)));
    config.chunk_size = 250;

    config.prompts.refine = "Improve {english_chunk}".to_string();
    assert_eq!(
        config.validate(),
        Err(ConfigError::MissingPlaceholder {
            stage: Stage::Refine,
            placeholder: "{korean_draft}",
        })
    );

    config.prompts.refine = "{english_chunk} / {korean_draft}".to_string();
    assert!(config.validate().is_ok());

    config.prompts.suggestion = "{english_chunk}".to_string();
    assert!(config.session_settings().is_err());
}

/// Missing keys fall back to defaults
#[test]
fn test_fromJson_withPartialConfig_shouldFillDefaults() {
    let config = Config::from_json(
        r#"{"chunk_size": 120, "glossary": {"default_decision": "keep-existing"}, "log_level": "debug"}"#,
    )
    .unwrap();

    assert_eq!(config.chunk_size, 120);
    assert_eq!(config.glossary.default_decision, Decision::KeepExisting);
    assert_eq!(config.glossary.file_name, DEFAULT_GLOSSARY_FILE_NAME);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.prompts.refine, Stage::Refine.default_template());

    let settings = config.session_settings().unwrap();
    assert_eq!(settings.chunk_size, 120);
    assert_eq!(settings.default_decision, Decision::KeepExisting);
}

/// A missing config file is created with the defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefault() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert_eq!(config, Config::default());
    assert!(path.exists());
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded, config);
    Ok(())
}

/// Saved settings are read back unchanged
#[test]
fn test_saveThenLoad_withCustomValues_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("settings.json");

    let mut config = Config::default();
    config.chunk_size = 75;
    config.prompts.draft = "Translate: {english_chunk}".to_string();
    config.log_level = LogLevel::Warn;
    config.save(&path)?;

    let json = std::fs::read_to_string(&path)?;
    assert!(json.contains("\"draft\""));
    assert!(!json.contains("\"prompts\""));
    assert_eq!(Config::load_or_create(&path)?, config);
    Ok(())
}

/// An unreadable config file is reported, not replaced
#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    assert_eq!(std::fs::read_to_string(&path)?, "{ not json");
    Ok(())
}
