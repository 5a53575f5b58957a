// Command handlers for bulkfs CLI

pub mod create;
pub mod delete;
pub mod history;
pub mod redo;
pub mod rename;
pub mod undo;

pub use create::CreateCommand;
pub use delete::DeleteCommand;
pub use history::HistoryCommand;
pub use redo::RedoCommand;
pub use rename::RenameCommand;
pub use undo::UndoCommand;

use std::path::Path;

use bulkfs_history::{
    run_mutation, Disposition, HistoryError, ItemOutcome, Journal, JsonFileStore,
    MutationExecutor, MutationReport, ReplayFailurePolicy, ReplayReport, RunMode, Stack,
    UndoRedoEngine,
};

use crate::config::Settings;
use crate::error::{CliError, CliResult};
use crate::logging::VerbosityLevel;
use crate::output::OutputStyle;
use crate::prompt::PromptConfirm;

/// State shared by every command of one invocation
pub struct CommandContext {
    pub settings: Settings,
    pub journal: Journal<JsonFileStore>,
    pub style: OutputStyle,
    pub verbosity: VerbosityLevel,
    /// Answer confirmation prompts with yes
    pub assume_yes: bool,
}

impl CommandContext {
    pub fn new(settings: Settings, verbosity: VerbosityLevel, assume_yes: bool) -> Self {
        let journal = Journal::new(JsonFileStore::new(&settings.history_file));
        Self {
            settings,
            journal,
            style: OutputStyle::default(),
            verbosity,
            assume_yes,
        }
    }

    fn print_outcomes(&self, outcomes: &[ItemOutcome]) {
        for outcome in outcomes {
            match &outcome.result {
                Ok(()) if self.verbosity.shows_items() => {
                    println!("{}", self.style.success(&outcome.change.to_string()))
                }
                Ok(()) => {}
                Err(failure) => println!("{}", self.style.error(&failure.to_string())),
            }
        }
    }

    fn warn_unsaved(&self, error: &HistoryError) {
        eprintln!(
            "{}",
            self.style
                .warning(&format!("History not saved, undo may be unavailable: {}", error))
        );
    }
}

/// Trait for command handlers
pub trait Command {
    /// Execute the command
    fn execute(&self, ctx: &mut CommandContext) -> CliResult<()>;
}

/// Run a bulk mutation and print what it did
pub(crate) fn run_bulk<E: MutationExecutor>(
    ctx: &mut CommandContext,
    executor: &E,
    preview: bool,
) -> CliResult<()> {
    let mode = if preview {
        RunMode::Preview
    } else {
        RunMode::Apply
    };
    let mut confirm = PromptConfirm::stdio(ctx.style, ctx.assume_yes);
    let report = run_mutation(executor, &mut ctx.journal, mode, &mut confirm)?;
    print_mutation(ctx, &report)
}

fn print_mutation(ctx: &CommandContext, report: &MutationReport) -> CliResult<()> {
    if report.preview {
        println!("{}", ctx.style.section("Preview (nothing changed)"));
        for change in &report.planned {
            println!("{}", ctx.style.list_item(&change.to_string()));
        }
        println!("{}", ctx.style.info(&format!("{} change(s) planned", report.planned.len())));
        return Ok(());
    }

    ctx.print_outcomes(&report.outcomes);
    for error in &report.persist_errors {
        ctx.warn_unsaved(error);
    }

    let applied = report.succeeded().count();
    let summary = format!("{} of {} change(s) applied", applied, report.planned.len());
    let failed = report.failed().count();
    if failed > 0 {
        println!("{}", ctx.style.warning(&summary));
        Err(CliError::ItemFailures { failed })
    } else {
        println!("{}", ctx.style.success(&summary));
        Ok(())
    }
}

/// Undo or redo the top record of `from` and print the result
pub(crate) fn run_replay(
    ctx: &mut CommandContext,
    directory: &Path,
    from: Stack,
    on_failure: Option<ReplayFailurePolicy>,
) -> CliResult<()> {
    let engine = UndoRedoEngine::new(on_failure.unwrap_or(ctx.settings.on_failure));
    let report = match from {
        Stack::Undo => engine.undo(&mut ctx.journal, directory)?,
        Stack::Redo => engine.redo(&mut ctx.journal, directory)?,
    };
    print_replay(ctx, &report)
}

fn print_replay(ctx: &CommandContext, report: &ReplayReport) -> CliResult<()> {
    ctx.print_outcomes(&report.outcomes);
    if let Some(error) = &report.persist_error {
        ctx.warn_unsaved(error);
    }

    let verb = match report.from {
        Stack::Undo => "Undone",
        Stack::Redo => "Redone",
    };
    match report.disposition {
        Disposition::Moved if !report.has_failures() => {
            println!("{}", ctx.style.success(&format!("{}: {}", verb, report.record)));
        }
        Disposition::Moved => {
            println!(
                "{}",
                ctx.style
                    .warning(&format!("{} with failures: {}", verb, report.record))
            );
        }
        Disposition::Discarded => {
            println!(
                "{}",
                ctx.style.warning(&format!(
                    "Could not {} {}; the record was discarded",
                    report.from, report.record
                ))
            );
        }
        Disposition::Retained => {
            println!(
                "{}",
                ctx.style.warning(&format!(
                    "Could not {} {}; the record was kept for another attempt",
                    report.from, report.record
                ))
            );
        }
    }

    let failed = report.outcomes.iter().filter(|o| !o.is_applied()).count();
    if failed > 0 {
        Err(CliError::ItemFailures { failed })
    } else {
        Ok(())
    }
}
