//! Bulk mutations: plan, preview, confirm, apply, record

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::HistoryError;
use crate::fs_change::{apply_all, FsChange, ItemOutcome};
use crate::journal::Journal;
use crate::record::OperationRecord;
use crate::scan::{self, RenamePattern};
use crate::store::HistoryStore;

/// Interactive yes/no gate in front of every destructive run
pub trait Confirm {
    /// Show `planned` and ask `question`; `true` lets the mutation proceed
    fn confirm(&mut self, question: &str, planned: &[FsChange]) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, question: &str, _planned: &[FsChange]) -> bool {
        self(question)
    }
}

/// Whether a run touches the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Report the planned changes only
    Preview,
    /// Confirm, apply and record
    Apply,
}

/// One kind of bulk mutation
pub trait MutationExecutor {
    /// Directory the mutation works in
    fn directory(&self) -> &Path;

    /// Every change the mutation intends to make, in application order
    fn plan(&self) -> Result<Vec<FsChange>, HistoryError>;

    /// Question put to the user before applying `changes`
    fn question(&self, changes: &[FsChange]) -> String;

    /// Records describing the changes that were actually applied
    fn records(&self, applied: &[FsChange]) -> Vec<OperationRecord>;
}

/// What a mutation run did
#[derive(Debug, Default)]
pub struct MutationReport {
    /// True when the run was a preview
    pub preview: bool,
    /// Changes computed by the plan
    pub planned: Vec<FsChange>,
    /// Per-item results; empty for previews
    pub outcomes: Vec<ItemOutcome>,
    /// Records appended to the history
    pub recorded: Vec<OperationRecord>,
    /// Failures to persist the history after an append
    pub persist_errors: Vec<HistoryError>,
}

impl MutationReport {
    /// Outcomes that were applied
    pub fn succeeded(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.is_applied())
    }

    /// Outcomes the filesystem refused
    pub fn failed(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| !o.is_applied())
    }

    /// Whether any item failed
    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

/// Run `executor` against `journal`.
///
/// Previews never touch the filesystem or the history. A declined
/// confirmation is `UserCancelled` with no side effects.
pub fn run_mutation<E, S, C>(
    executor: &E,
    journal: &mut Journal<S>,
    mode: RunMode,
    confirm: &mut C,
) -> Result<MutationReport, HistoryError>
where
    E: MutationExecutor + ?Sized,
    S: HistoryStore,
    C: Confirm + ?Sized,
{
    let planned = executor.plan()?;
    debug!(dir = %executor.directory().display(), count = planned.len(), "planned changes");

    if mode == RunMode::Preview {
        return Ok(MutationReport {
            preview: true,
            planned,
            ..MutationReport::default()
        });
    }

    if !confirm.confirm(&executor.question(&planned), &planned) {
        info!("mutation declined");
        return Err(HistoryError::UserCancelled);
    }

    let outcomes = apply_all(executor.directory(), planned.iter().cloned());
    let applied: Vec<FsChange> = outcomes
        .iter()
        .filter(|o| o.is_applied())
        .map(|o| o.change.clone())
        .collect();

    let recorded = executor.records(&applied);
    let mut persist_errors = Vec::new();
    for record in &recorded {
        if let Err(e) = journal.append(record.clone()) {
            persist_errors.push(e);
        }
    }

    Ok(MutationReport {
        preview: false,
        planned,
        outcomes,
        recorded,
        persist_errors,
    })
}

/// Renames every entry whose name matches a pattern.
///
/// Each renamed entry becomes its own record, so renames undo one at a time.
#[derive(Debug, Clone)]
pub struct RenameExecutor {
    directory: PathBuf,
    pattern: RenamePattern,
    source: String,
}

impl RenameExecutor {
    /// Compile `pattern` for use in `directory`
    pub fn new(
        directory: impl Into<PathBuf>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, HistoryError> {
        Ok(RenameExecutor {
            directory: directory.into(),
            pattern: RenamePattern::new(pattern, replacement)?,
            source: pattern.to_string(),
        })
    }
}

impl MutationExecutor for RenameExecutor {
    fn directory(&self) -> &Path {
        &self.directory
    }

    fn plan(&self) -> Result<Vec<FsChange>, HistoryError> {
        scan::ensure_directory(&self.directory)?;
        let changes: Vec<FsChange> = scan::list_entries(&self.directory)?
            .into_iter()
            .filter_map(|name| {
                self.pattern
                    .new_name(&name)
                    .map(|to| FsChange::Rename { from: name, to })
            })
            .collect();

        if changes.is_empty() {
            return Err(HistoryError::no_match(format!(
                "no entries in {} match '{}'",
                self.directory.display(),
                self.source
            )));
        }
        Ok(changes)
    }

    fn question(&self, changes: &[FsChange]) -> String {
        format!(
            "Rename {} entries in {}?",
            changes.len(),
            self.directory.display()
        )
    }

    fn records(&self, applied: &[FsChange]) -> Vec<OperationRecord> {
        applied
            .iter()
            .filter_map(|change| match change {
                FsChange::Rename { from, to } => Some(OperationRecord::rename(from, to)),
                _ => None,
            })
            .collect()
    }
}

/// Creates `count` numbered folders
#[derive(Debug, Clone)]
pub struct CreateBatchExecutor {
    directory: PathBuf,
    count: usize,
}

impl CreateBatchExecutor {
    /// Prepare the creation of `count` folders in `directory`
    pub fn new(directory: impl Into<PathBuf>, count: usize) -> Self {
        CreateBatchExecutor {
            directory: directory.into(),
            count,
        }
    }
}

impl MutationExecutor for CreateBatchExecutor {
    fn directory(&self) -> &Path {
        &self.directory
    }

    fn plan(&self) -> Result<Vec<FsChange>, HistoryError> {
        scan::ensure_directory(&self.directory)?;
        if self.count == 0 {
            return Err(HistoryError::no_match("folder count is zero"));
        }
        Ok(scan::numbered_folder_names(self.count)
            .into_iter()
            .map(FsChange::CreateFolder)
            .collect())
    }

    fn question(&self, changes: &[FsChange]) -> String {
        format!(
            "Create {} folders in {}?",
            changes.len(),
            self.directory.display()
        )
    }

    fn records(&self, applied: &[FsChange]) -> Vec<OperationRecord> {
        let folders: Vec<&str> = applied
            .iter()
            .filter_map(|change| match change {
                FsChange::CreateFolder(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        if folders.is_empty() {
            return Vec::new();
        }
        vec![OperationRecord::create_batch(folders)]
    }
}

/// Removes every direct subfolder; only empty folders can go
#[derive(Debug, Clone)]
pub struct DeleteBatchExecutor {
    directory: PathBuf,
}

impl DeleteBatchExecutor {
    /// Prepare the removal of the subfolders of `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        DeleteBatchExecutor {
            directory: directory.into(),
        }
    }
}

impl MutationExecutor for DeleteBatchExecutor {
    fn directory(&self) -> &Path {
        &self.directory
    }

    fn plan(&self) -> Result<Vec<FsChange>, HistoryError> {
        scan::ensure_directory(&self.directory)?;
        let folders = scan::subdirectories(&self.directory)?;
        if folders.is_empty() {
            return Err(HistoryError::no_match(format!(
                "no folders to delete in {}",
                self.directory.display()
            )));
        }
        Ok(folders.into_iter().map(FsChange::RemoveFolder).collect())
    }

    fn question(&self, changes: &[FsChange]) -> String {
        format!(
            "Delete {} folders in {}?",
            changes.len(),
            self.directory.display()
        )
    }

    fn records(&self, applied: &[FsChange]) -> Vec<OperationRecord> {
        let folders: Vec<&str> = applied
            .iter()
            .filter_map(|change| match change {
                FsChange::RemoveFolder(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        if folders.is_empty() {
            return Vec::new();
        }
        vec![OperationRecord::delete_batch(folders)]
    }
}
