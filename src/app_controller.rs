/*!
 * Application controller.
 *
 * Runs the command-line operations (chunk listing, prompt rendering,
 * discrepancy checks, non-interactive merges) and the interactive session.
 * Output always goes to a caller-supplied writer and interactive input comes
 * from any `BufRead`, so the terminal and the tests share one code path.
 */

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::app_config::Config;
use crate::document::{Chunk, chunk_paragraphs};
use crate::errors::{InputError, MergeError};
use crate::file_utils::FileManager;
use crate::glossary::{
    Conflict, Decision, Decisions, Discrepancy, GlossaryStore, MergeSummary, parse_entries,
};
use crate::prompts::{ReviewPayload, Stage};
use crate::workflow::{
    Direction, Effect, Session, SessionSettings, Step, TermProposal, chunk_discrepancies,
    chunk_suggestion_prompt,
};

/// Line that ends a multi-line paste in the interactive session
pub const END_OF_INPUT: &str = ".";

/// Arguments of the `prompt` command.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    /// Source document
    pub document: PathBuf,
    /// 1-based chunk number
    pub chunk: usize,
    /// Stage to render
    pub stage: Stage,
    /// Draft translation file, required for the refine stage
    pub draft: Option<PathBuf>,
    /// Final translation file, required for the suggestion stage
    pub translation: Option<PathBuf>,
}

/// Arguments of the `merge` command.
#[derive(Debug, Clone, Default)]
pub struct MergeRequest {
    /// File holding the suggested terms, one per line
    pub suggestions: PathBuf,
    /// Glossary file to update
    pub glossary: PathBuf,
    /// Source terms whose stored target is kept
    pub keep: Vec<String>,
    /// Source terms whose proposed target is adopted
    pub adopt: Vec<String>,
    /// Decision for every conflict not named in `keep` or `adopt`
    pub batch: Option<Decision>,
    /// Report without writing the glossary
    pub dry_run: bool,
}

/// How a `merge` run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Every suggestion already matched the glossary
    NothingToDo,
    /// The merge was resolved; `saved` is false for dry runs and no-op merges
    Applied {
        /// Counts of the resolved merge
        summary: MergeSummary,
        /// Whether the glossary file was written
        saved: bool,
    },
    /// Some conflicts had no decision, nothing was applied
    Cancelled {
        /// Source terms left undecided
        missing: Vec<String>,
    },
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config
            .validate()
            .context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Settings for new sessions
    pub fn session_settings(&self) -> Result<SessionSettings> {
        Ok(self.config.session_settings()?)
    }

    /// Explicit glossary path, or the configured file name next to the document
    pub fn glossary_path(&self, document: Option<&Path>, glossary: Option<&Path>) -> Result<PathBuf> {
        match (glossary, document) {
            (Some(glossary), _) => Ok(glossary.to_path_buf()),
            (None, Some(document)) => Ok(FileManager::default_glossary_path(
                document,
                &self.config.glossary.file_name,
            )),
            (None, None) => Err(anyhow!("Either a glossary file or a document is required")),
        }
    }

    /// Load a document and a glossary into a fresh session at chunk 1
    pub fn open_session(&self, document: &Path, glossary: GlossaryStore) -> Result<Session> {
        let paragraphs = FileManager::read_paragraphs(document)?;
        debug!("Read {} paragraph(s) from {:?}", paragraphs.len(), document);

        let session = Session::load(&paragraphs, glossary, self.session_settings()?)
            .with_context(|| format!("Failed to load document: {:?}", document))?;
        Ok(session)
    }

    // @method: Open a session and walk forward to a 1-based chunk number
    fn session_at(&self, document: &Path, glossary: GlossaryStore, chunk: usize) -> Result<Session> {
        let mut session = self.open_session(document, glossary)?;
        check_chunk_number(chunk, session.chunk_count())?;
        for _ in 1..chunk {
            session.navigate(Direction::Next)?;
        }
        Ok(session)
    }

    // @method: Read and chunk a document, refusing documents without chunks
    fn load_chunks(&self, document: &Path) -> Result<Vec<Chunk>> {
        let paragraphs = FileManager::read_paragraphs(document)?;
        let chunks = chunk_paragraphs(&paragraphs, self.config.chunk_size)?;
        if chunks.is_empty() {
            return Err(InputError::EmptyDocument.into());
        }
        Ok(chunks)
    }

    // @method: One chunk by its 1-based number
    fn chunk_at(&self, document: &Path, chunk: usize) -> Result<Chunk> {
        let mut chunks = self.load_chunks(document)?;
        check_chunk_number(chunk, chunks.len())?;
        Ok(chunks.swap_remove(chunk - 1))
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Print every chunk with its paragraph range and word count
    pub fn list_chunks<W: Write>(&self, document: &Path, out: &mut W) -> Result<usize> {
        let chunks = self.load_chunks(document)?;

        for chunk in &chunks {
            writeln!(
                out,
                "Chunk {}/{}: paragraphs {}-{}, {} words",
                chunk.index + 1,
                chunks.len(),
                chunk.paragraphs.start + 1,
                chunk.paragraphs.end,
                chunk.word_count
            )?;
        }
        Ok(chunks.len())
    }

    /// Render one stage prompt for a chunk
    pub fn write_prompt<W: Write>(&self, request: &PromptRequest, out: &mut W) -> Result<String> {
        let prompt = match request.stage {
            Stage::Draft => {
                let mut session =
                    self.session_at(&request.document, GlossaryStore::new(), request.chunk)?;
                shown_prompt(session.confirm(None)?)?
            }
            Stage::Refine => {
                let draft = read_required(request.draft.as_deref(), "--draft")?;
                let mut session =
                    self.session_at(&request.document, GlossaryStore::new(), request.chunk)?;
                session.confirm(None)?;
                shown_prompt(session.confirm(Some(&draft))?)?
            }
            Stage::Suggestion => {
                let payload = read_required(request.translation.as_deref(), "--translation")?;
                let chunk = self.chunk_at(&request.document, request.chunk)?;
                chunk_suggestion_prompt(&self.session_settings()?.prompts, &chunk, &payload)?
            }
        };

        writeln!(out, "{}", prompt)?;
        Ok(prompt)
    }

    /// Report glossary terms of a chunk whose target is missing from a translation
    pub fn check<W: Write>(
        &self,
        document: &Path,
        chunk: usize,
        translation: &Path,
        glossary: &Path,
        out: &mut W,
    ) -> Result<Vec<Discrepancy>> {
        let store = GlossaryStore::load(glossary)?;
        let chunk = self.chunk_at(document, chunk)?;
        let payload = FileManager::read_to_string(translation)?;

        let found = chunk_discrepancies(&chunk, &store, &payload)?;
        write_check_report(out, &payload, &found)?;
        Ok(found)
    }

    /// Merge suggested terms into a glossary file without interaction
    pub fn merge<W: Write>(&self, request: &MergeRequest, out: &mut W) -> Result<MergeOutcome> {
        let text = FileManager::read_to_string(&request.suggestions)?;
        if text.trim().is_empty() {
            return Err(InputError::EmptySuggestions.into());
        }
        if let Some(term) = request.keep.iter().find(|term| request.adopt.contains(term)) {
            return Err(MergeError::ContradictoryDecision { term: term.clone() }.into());
        }

        let mut store = GlossaryStore::load(&request.glossary)?;
        let plan = store.plan_merge(parse_entries(&text));
        if plan.is_empty() {
            writeln!(out, "{}", MergeSummary::default())?;
            return Ok(MergeOutcome::NothingToDo);
        }

        let mut decisions = match request.batch {
            Some(decision) => Decisions::all(&plan, decision),
            None => Decisions::new(),
        };
        let named = request
            .keep
            .iter()
            .map(|term| (term, Decision::KeepExisting))
            .chain(request.adopt.iter().map(|term| (term, Decision::AdoptProposed)));
        for (term, decision) in named {
            match plan.conflict_for(term) {
                Some(conflict) => decisions.set(conflict.id, decision),
                None => warn!("No conflict for '{}', decision ignored", term),
            }
        }

        if plan.has_conflicts() {
            write_conflicts(out, &plan.conflicts, &decisions)?;
        }

        let summary = match store.apply_merge(&plan, &decisions) {
            Ok(summary) => summary,
            Err(MergeError::IncompleteDecisions { missing }) => {
                writeln!(
                    out,
                    "Merge cancelled, no decision for: {}",
                    missing.join(", ")
                )?;
                return Ok(MergeOutcome::Cancelled { missing });
            }
            Err(e) => return Err(e.into()),
        };

        let saved = !request.dry_run && summary.changed();
        if saved {
            store.save(&request.glossary)?;
        }

        if request.dry_run {
            writeln!(out, "Dry run, glossary not written: {}", summary)?;
        } else {
            writeln!(out, "{}", summary)?;
        }
        Ok(MergeOutcome::Applied { summary, saved })
    }

    /// Run the interactive session until `quit` or end of input.
    ///
    /// Returns the session as it was left, unsaved changes included.
    pub fn run_session<R: BufRead, W: Write>(
        &self,
        document: &Path,
        glossary_path: &Path,
        input: R,
        out: W,
    ) -> Result<Session> {
        let store = GlossaryStore::load(glossary_path)?;
        let session = self.open_session(document, store)?;
        info!(
            "Session started for {:?} with glossary {:?}",
            document, glossary_path
        );

        let mut interaction = Interaction {
            session,
            glossary_path: glossary_path.to_path_buf(),
            input,
            out,
            quit_warned: false,
        };
        interaction.run()?;
        Ok(interaction.session)
    }
}

// =============================================================================
// Interactive session
// =============================================================================

/// Commands understood by the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Status,
    Go,
    Next,
    Prev,
    Check,
    Suggest,
    Terms,
    Save,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "status" | "s" => Ok(Self::Status),
            "go" | "g" => Ok(Self::Go),
            "next" | "n" => Ok(Self::Next),
            "prev" | "previous" | "p" => Ok(Self::Prev),
            "check" | "c" => Ok(Self::Check),
            "suggest" => Ok(Self::Suggest),
            "terms" | "t" => Ok(Self::Terms),
            "save" => Ok(Self::Save),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            _ => Err(anyhow!("Unknown command: {}", s.trim())),
        }
    }
}

const HELP: &str = "\
Commands:
  status   show the current chunk, step and glossary state
  go       confirm the current step (asks for the draft at the refine step)
  next     move to the next chunk
  prev     move to the previous chunk
  check    paste a translation and list glossary terms it misses
  suggest  paste the final translation and print the term-suggestion prompt
  terms    paste suggested terms and merge them into the glossary
  save     write the glossary file
  help     show this list
  quit     leave the session
check, suggest and terms open once the refinement is confirmed.
Multi-line input ends with a line holding a single '.'";

enum Flow {
    Continue,
    Quit,
}

struct Interaction<R, W> {
    session: Session,
    glossary_path: PathBuf,
    input: R,
    out: W,
    quit_warned: bool,
}

impl<R: BufRead, W: Write> Interaction<R, W> {
    fn run(&mut self) -> Result<()> {
        writeln!(self.out, "Type 'help' for commands.")?;
        self.write_status()?;

        loop {
            write!(self.out, "{} > ", self.session.progress_label())?;
            self.out.flush()?;

            let Some(line) = self.read_line()? else {
                if self.session.is_glossary_dirty() {
                    warn!("Input ended with unsaved glossary changes");
                }
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let command = match line.parse::<SessionCommand>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.out, "{}. Type 'help' for commands.", e)?;
                    continue;
                }
            };
            if command != SessionCommand::Quit {
                self.quit_warned = false;
            }

            match self.dispatch(command) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => writeln!(self.out, "Error: {:#}", e)?,
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, command: SessionCommand) -> Result<Flow> {
        match command {
            SessionCommand::Status => self.write_status()?,
            SessionCommand::Go => self.go()?,
            SessionCommand::Next => self.navigate(Direction::Next)?,
            SessionCommand::Prev => self.navigate(Direction::Previous)?,
            SessionCommand::Check => self.check()?,
            SessionCommand::Suggest => self.suggest()?,
            SessionCommand::Terms => self.terms()?,
            SessionCommand::Save => self.save()?,
            SessionCommand::Help => writeln!(self.out, "{}", HELP)?,
            SessionCommand::Quit => return self.quit(),
        }
        Ok(Flow::Continue)
    }

    fn write_status(&mut self) -> Result<()> {
        let step = self.session.step();
        writeln!(self.out, "{}", self.session.progress_label())?;
        if step.is_terminal() {
            writeln!(self.out, "Chunk completed, use 'next' or 'prev' to move on")?;
        } else {
            writeln!(self.out, "Step {}: {}", step.number(), step.action_label())?;
        }
        writeln!(
            self.out,
            "Glossary: {} term(s){}",
            self.session.glossary().len(),
            if self.session.is_glossary_dirty() { ", unsaved changes" } else { "" }
        )?;
        Ok(())
    }

    fn go(&mut self) -> Result<()> {
        let effect = if self.session.step() == Step::Refine {
            let draft = self.read_block("Paste the draft translation")?;
            self.session.confirm(Some(&draft))?
        } else {
            self.session.confirm(None)?
        };
        self.show_effect(effect)
    }

    fn navigate(&mut self, direction: Direction) -> Result<()> {
        let effect = self.session.navigate(direction)?;
        self.show_effect(effect)
    }

    fn show_effect(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::ShowPrompt { stage, prompt } => {
                writeln!(self.out, "----- {} prompt -----", stage)?;
                writeln!(self.out, "{}", prompt)?;
                writeln!(self.out, "----- end of prompt -----")?;
            }
            Effect::OpenReview { chunk_index } => {
                writeln!(
                    self.out,
                    "Reviewing chunk {}: use 'check', 'suggest' and 'terms', then 'save'",
                    chunk_index + 1
                )?;
            }
            Effect::ChunkChanged { .. } => self.write_status()?,
            Effect::BoundaryReached { direction } => {
                let end = match direction {
                    Direction::Previous => "first",
                    Direction::Next => "last",
                };
                writeln!(self.out, "Already at the {} chunk", end)?;
            }
        }
        Ok(())
    }

    fn check(&mut self) -> Result<()> {
        self.session.ensure_review_open()?;
        let payload = self.read_block("Paste the translation to check")?;
        let found = self.session.check_discrepancies(&payload)?;
        write_check_report(&mut self.out, &payload, &found)
    }

    fn suggest(&mut self) -> Result<()> {
        self.session.ensure_review_open()?;
        let payload = self.read_block("Paste the final translation")?;
        let prompt = self.session.suggestion_prompt(&payload)?;
        self.show_effect(Effect::ShowPrompt {
            stage: Stage::Suggestion,
            prompt,
        })
    }

    fn terms(&mut self) -> Result<()> {
        self.session.ensure_review_open()?;
        let suggestions = self.read_block("Paste the suggested terms")?;
        match self.session.propose_terms(&suggestions)? {
            TermProposal::NothingToDo => writeln!(self.out, "{}", MergeSummary::default())?,
            TermProposal::Applied(summary) => write_summary(&mut self.out, &summary)?,
            TermProposal::AwaitingDecisions {
                additions,
                conflicts,
                provisional,
            } => {
                writeln!(
                    self.out,
                    "{} new term(s) wait on {} conflict(s)",
                    additions,
                    conflicts.len()
                )?;
                write_conflicts(&mut self.out, &conflicts, &provisional)?;

                let decisions = match self.collect_decisions(&conflicts, &provisional) {
                    Ok(Some(decisions)) => decisions,
                    Ok(None) => {
                        self.session.cancel_merge();
                        writeln!(self.out, "Term merge cancelled")?;
                        return Ok(());
                    }
                    Err(e) => {
                        self.session.cancel_merge();
                        return Err(e.context("Term merge cancelled"));
                    }
                };
                let summary = self.session.commit_merge(&decisions)?;
                write_summary(&mut self.out, &summary)?;
            }
        }
        Ok(())
    }

    // @returns: Decisions for every conflict, or None when cancelled
    fn collect_decisions(
        &mut self,
        conflicts: &[Conflict],
        provisional: &Decisions,
    ) -> Result<Option<Decisions>> {
        writeln!(
            self.out,
            "Enter 'keep-all', 'adopt-all' or 'cancel', or press Enter to decide one by one"
        )?;
        let Some(batch) = self.read_line()? else {
            return Ok(None);
        };
        match batch.trim().to_lowercase().as_str() {
            "" => {}
            "keep-all" => return Ok(self.batch_decisions(Decision::KeepExisting)),
            "adopt-all" => return Ok(self.batch_decisions(Decision::AdoptProposed)),
            "cancel" => return Ok(None),
            other => {
                writeln!(self.out, "Unknown choice '{}', deciding one by one", other)?;
            }
        }

        let mut decisions = Decisions::new();
        for conflict in conflicts {
            let default = provisional.get(conflict.id).unwrap_or_default();
            loop {
                write!(
                    self.out,
                    "{} {}: [k]eep '{}' or [a]dopt '{}'? ({}) ",
                    conflict.id, conflict.source, conflict.existing, conflict.proposed, default
                )?;
                self.out.flush()?;

                let Some(answer) = self.read_line()? else {
                    return Ok(None);
                };
                let answer = answer.trim();
                if answer.eq_ignore_ascii_case("cancel") {
                    return Ok(None);
                }
                if answer.is_empty() {
                    decisions.set(conflict.id, default);
                    break;
                }
                match answer.parse::<Decision>() {
                    Ok(decision) => {
                        decisions.set(conflict.id, decision);
                        break;
                    }
                    Err(e) => writeln!(self.out, "{}", e)?,
                }
            }
        }
        Ok(Some(decisions))
    }

    fn batch_decisions(&self, decision: Decision) -> Option<Decisions> {
        self.session
            .pending_merge()
            .map(|plan| Decisions::all(plan, decision))
    }

    fn save(&mut self) -> Result<()> {
        self.session.glossary().save(&self.glossary_path)?;
        self.session.mark_saved();
        writeln!(
            self.out,
            "Saved {} term(s) to {}",
            self.session.glossary().len(),
            self.glossary_path.display()
        )?;
        Ok(())
    }

    fn quit(&mut self) -> Result<Flow> {
        if self.session.is_glossary_dirty() && !self.quit_warned {
            self.quit_warned = true;
            writeln!(
                self.out,
                "The glossary has unsaved changes. Use 'save', or 'quit' again to discard them"
            )?;
            return Ok(Flow::Continue);
        }
        Ok(Flow::Quit)
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    // @reads: Lines up to a lone '.' or end of input
    fn read_block(&mut self, label: &str) -> Result<String> {
        writeln!(self.out, "{} (end with a line containing only '{}'):", label, END_OF_INPUT)?;
        self.out.flush()?;

        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.trim() == END_OF_INPUT {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }
}

fn shown_prompt(effect: Effect) -> Result<String> {
    match effect {
        Effect::ShowPrompt { prompt, .. } => Ok(prompt),
        other => Err(anyhow!("Expected a prompt, got {:?}", other)),
    }
}

fn read_required(path: Option<&Path>, flag: &str) -> Result<String> {
    let path = path.ok_or_else(|| anyhow!("{} is required for this stage", flag))?;
    FileManager::read_to_string(path)
}

fn check_chunk_number(chunk: usize, total: usize) -> Result<()> {
    if chunk == 0 || chunk > total {
        return Err(anyhow!(
            "Chunk {} is out of range, the document has {} chunk(s)",
            chunk,
            total
        ));
    }
    Ok(())
}

// @writes: Rationale, marker notice and missing terms of a checked payload
fn write_check_report<W: Write>(out: &mut W, payload: &str, found: &[Discrepancy]) -> Result<()> {
    let review = ReviewPayload::parse(payload);
    if let Some(rationale) = review.rationale {
        writeln!(out, "Reasons for changes:\n{}", rationale)?;
    }
    if !review.has_markers {
        writeln!(out, "No translation markers found, checking the whole text")?;
    }
    write_discrepancies(out, found)
}

fn write_summary<W: Write>(out: &mut W, summary: &MergeSummary) -> Result<()> {
    if summary.changed() {
        writeln!(out, "Glossary {}", summary)?;
    } else {
        writeln!(out, "{}", summary)?;
    }
    Ok(())
}

fn write_discrepancies<W: Write>(out: &mut W, found: &[Discrepancy]) -> Result<()> {
    if found.is_empty() {
        writeln!(out, "No glossary discrepancies found")?;
        return Ok(());
    }
    writeln!(out, "{} glossary term(s) missing from the translation:", found.len())?;
    for discrepancy in found {
        writeln!(out, "  {}", discrepancy)?;
    }
    Ok(())
}

fn write_conflicts<W: Write>(out: &mut W, conflicts: &[Conflict], decisions: &Decisions) -> Result<()> {
    writeln!(out, "Conflicts:")?;
    for conflict in conflicts {
        let decision = decisions
            .get(conflict.id)
            .map(|d| d.label())
            .unwrap_or("undecided");
        writeln!(
            out,
            "  {} {}: existing '{}', proposed '{}' -> {}",
            conflict.id, conflict.source, conflict.existing, conflict.proposed, decision
        )?;
    }
    Ok(())
}
