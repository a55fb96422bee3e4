// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error};
use std::io::Write;
use std::path::PathBuf;

use draftwise::app_config::{self, Config};
use draftwise::app_controller::{Controller, MergeOutcome, MergeRequest, PromptRequest};
use draftwise::glossary::Decision;
use draftwise::prompts::Stage;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for Stage to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliStage {
    Draft,
    Refine,
    Suggestion,
}

impl From<CliStage> for Stage {
    fn from(cli_stage: CliStage) -> Self {
        match cli_stage {
            CliStage::Draft => Stage::Draft,
            CliStage::Refine => Stage::Refine,
            CliStage::Suggestion => Stage::Suggestion,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the chunks of a document
    Chunks {
        /// Source document, one paragraph per line
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Target words per chunk, overriding the config
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Print the prompt of one stage for a chunk
    Prompt {
        /// Source document
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// 1-based chunk number
        #[arg(short, long)]
        chunk: usize,

        /// Stage to render
        #[arg(short, long, value_enum)]
        stage: CliStage,

        /// Draft translation file (refine stage)
        #[arg(long)]
        draft: Option<PathBuf>,

        /// Final translation file (suggestion stage)
        #[arg(long)]
        translation: Option<PathBuf>,
    },

    /// List glossary terms of a chunk that a translation misses
    Check {
        /// Source document
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// 1-based chunk number
        #[arg(short, long)]
        chunk: usize,

        /// Translation file, with or without the translation markers
        #[arg(short, long)]
        translation: PathBuf,

        /// Glossary file (defaults to the glossary next to the document)
        #[arg(short, long)]
        glossary: Option<PathBuf>,
    },

    /// Merge suggested terms into the glossary
    Merge {
        /// File with suggested terms, one per line
        #[arg(short, long)]
        suggestions: PathBuf,

        /// Glossary file
        #[arg(short, long, required_unless_present = "document")]
        glossary: Option<PathBuf>,

        /// Document whose neighbouring glossary should be used
        #[arg(value_name = "DOCUMENT")]
        document: Option<PathBuf>,

        /// Keep the stored target for this source term
        #[arg(long, value_name = "TERM")]
        keep: Vec<String>,

        /// Adopt the proposed target for this source term
        #[arg(long, value_name = "TERM")]
        adopt: Vec<String>,

        /// Keep the stored target for every other conflict
        #[arg(long, conflicts_with = "adopt_all")]
        keep_all: bool,

        /// Adopt the proposed target for every other conflict
        #[arg(long)]
        adopt_all: bool,

        /// Show the outcome without writing the glossary
        #[arg(long)]
        dry_run: bool,
    },

    /// Work through a document interactively
    Session {
        /// Source document
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Glossary file (defaults to the glossary next to the document)
        #[arg(short, long)]
        glossary: Option<PathBuf>,
    },

    /// Generate shell completions for draftwise
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Draftwise - chunked, glossary-aware translation drafting
///
/// Splits an English document into chunks, renders the prompts that move each
/// chunk from a first draft to a reviewed translation, and keeps a term
/// glossary consistent along the way.
#[derive(Parser, Debug)]
#[command(name = "draftwise")]
#[command(version)]
#[command(about = "Chunked, glossary-aware translation drafting")]
#[command(long_about = "Draftwise splits a document into chunks and renders the prompts for a draft, refine and review workflow while keeping a term glossary consistent.

EXAMPLES:
    draftwise chunks contract.txt                              # List chunks
    draftwise prompt contract.txt -c 2 -s draft                # Draft prompt of chunk 2
    draftwise prompt contract.txt -c 2 -s refine --draft d.txt # Refinement prompt
    draftwise check contract.txt -c 2 -t final.txt             # Missing glossary terms
    draftwise merge -s terms.txt contract.txt --adopt-all      # Merge suggested terms
    draftwise session contract.txt                             # Interactive workflow
    draftwise completions bash > draftwise.bash                # Bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI colour for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "\x1B[1;31m"),
            Level::Warn => ("WARN ", "\x1B[1;33m"),
            Level::Info => ("INFO ", "\x1B[1;32m"),
            Level::Debug => ("DEBUG", "\x1B[1;36m"),
            Level::Trace => ("TRACE", "\x1B[1;35m"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (tag, colour) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    // The logger accepts everything; the effective level is set through
    // log::set_max_level once the config is known
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialise logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: CommandLineOptions) -> Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "draftwise", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config)?;
    match &cli.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }
    if let Commands::Chunks { chunk_size: Some(size), .. } = &cli.command {
        config.chunk_size = *size;
    }
    debug!("Using config {:?}", cli.config);

    let controller = Controller::with_config(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Chunks { document, .. } => {
            controller.list_chunks(&document, &mut out)?;
        }
        Commands::Prompt {
            document,
            chunk,
            stage,
            draft,
            translation,
        } => {
            let request = PromptRequest {
                document,
                chunk,
                stage: stage.into(),
                draft,
                translation,
            };
            controller.write_prompt(&request, &mut out)?;
        }
        Commands::Check {
            document,
            chunk,
            translation,
            glossary,
        } => {
            let glossary = controller.glossary_path(Some(document.as_path()), glossary.as_deref())?;
            controller.check(&document, chunk, &translation, &glossary, &mut out)?;
        }
        Commands::Merge {
            suggestions,
            glossary,
            document,
            keep,
            adopt,
            keep_all,
            adopt_all,
            dry_run,
        } => {
            let glossary = controller.glossary_path(document.as_deref(), glossary.as_deref())?;
            let batch = if keep_all {
                Some(Decision::KeepExisting)
            } else if adopt_all {
                Some(Decision::AdoptProposed)
            } else {
                None
            };
            let request = MergeRequest {
                suggestions,
                glossary,
                keep,
                adopt,
                batch,
                dry_run,
            };
            if let MergeOutcome::Cancelled { .. } = controller.merge(&request, &mut out)? {
                anyhow::bail!("Merge cancelled: decide every conflict with --keep/--adopt or a batch flag");
            }
        }
        Commands::Session { document, glossary } => {
            let glossary = controller.glossary_path(Some(document.as_path()), glossary.as_deref())?;
            let stdin = std::io::stdin();
            controller
                .run_session(&document, &glossary, stdin.lock(), &mut out)
                .context("Interactive session failed")?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
