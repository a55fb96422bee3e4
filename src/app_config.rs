use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::errors::ConfigError;
use crate::file_utils::FileManager;
use crate::glossary::Decision;
use crate::prompts::{PromptSet, Stage};
use crate::workflow::SessionSettings;

/// Default target words per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 400;

/// Default glossary file name, placed next to the source document
pub const DEFAULT_GLOSSARY_FILE_NAME: &str = "Translation glossary.txt";

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Target words per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Prompt templates, stored at the top level of the file
    #[serde(flatten)]
    pub prompts: PromptConfig,

    /// Glossary settings
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Prompt templates for each stage
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PromptConfig {
    /// First-pass translation prompt
    /// Placeholders: {english_chunk}
    #[serde(default = "default_draft_prompt", alias = "prompt1")]
    pub draft: String,

    /// Refinement prompt
    /// Placeholders: {english_chunk}, {korean_draft}
    #[serde(default = "default_refine_prompt", alias = "prompt2")]
    pub refine: String,

    /// Term-suggestion prompt
    /// Placeholders: {english_chunk}, {final_korean_text}
    #[serde(default = "default_suggestion_prompt")]
    pub suggestion: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            draft: default_draft_prompt(),
            refine: default_refine_prompt(),
            suggestion: default_suggestion_prompt(),
        }
    }
}

/// Glossary settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GlossaryConfig {
    /// File name used when no glossary path is given
    #[serde(default = "default_glossary_file_name")]
    pub file_name: String,

    /// Decision pre-selected for conflicting suggestions
    #[serde(default)]
    pub default_decision: Decision,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            file_name: default_glossary_file_name(),
            default_decision: Decision::default(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_draft_prompt() -> String {
    Stage::Draft.default_template().to_string()
}

fn default_refine_prompt() -> String {
    Stage::Refine.default_template().to_string()
}

fn default_suggestion_prompt() -> String {
    Stage::Suggestion.default_template().to_string()
}

fn default_glossary_file_name() -> String {
    DEFAULT_GLOSSARY_FILE_NAME.to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }
        self.prompt_set().map(|_| ())
    }

    /// Build the validated prompt templates
    pub fn prompt_set(&self) -> Result<PromptSet, ConfigError> {
        PromptSet::new(&self.prompts.draft, &self.prompts.refine, &self.prompts.suggestion)
    }

    /// Build session settings, validating first
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        self.validate()?;
        Ok(SessionSettings {
            chunk_size: self.chunk_size,
            prompts: self.prompt_set()?,
            default_decision: self.glossary.default_decision,
        })
    }

    /// Parse a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load the configuration, writing the default one if the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if FileManager::file_exists(path) {
            let content = FileManager::read_to_string(path)?;
            let config = Self::from_json(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        FileManager::write_atomically(path, &json)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            chunk_size: default_chunk_size(),
            prompts: PromptConfig::default(),
            glossary: GlossaryConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
