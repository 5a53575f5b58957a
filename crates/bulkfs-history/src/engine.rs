//! Undo/redo state machine over the journal

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HistoryError, Stack};
use crate::fs_change::{apply_all, FsChange, ItemOutcome};
use crate::journal::Journal;
use crate::record::OperationRecord;
use crate::scan;
use crate::store::HistoryStore;

/// What happens to a rename record whose replay fails.
///
/// Batch records are unaffected: they always move to the other stack, even
/// when some of their items fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayFailurePolicy {
    /// Drop the record; it reaches neither stack
    #[default]
    Discard,
    /// Put the record back where it was taken from
    Retain,
}

impl fmt::Display for ReplayFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayFailurePolicy::Discard => write!(f, "discard"),
            ReplayFailurePolicy::Retain => write!(f, "retain"),
        }
    }
}

impl FromStr for ReplayFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "discard" => Ok(ReplayFailurePolicy::Discard),
            "retain" => Ok(ReplayFailurePolicy::Retain),
            other => Err(format!(
                "unknown failure policy '{}' (expected 'discard' or 'retain')",
                other
            )),
        }
    }
}

/// Where a replayed record ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Moved to the opposite stack
    Moved,
    /// Dropped after a failed rename replay
    Discarded,
    /// Returned to its stack after a failed rename replay
    Retained,
}

/// What an undo or redo did
#[derive(Debug)]
pub struct ReplayReport {
    /// Stack the record was taken from
    pub from: Stack,
    /// The replayed record
    pub record: OperationRecord,
    /// Per-item results
    pub outcomes: Vec<ItemOutcome>,
    /// Where the record ended up
    pub disposition: Disposition,
    /// Failure to persist the history afterwards
    pub persist_error: Option<HistoryError>,
}

impl ReplayReport {
    /// Whether any item failed
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_applied())
    }
}

/// Replays records from the journal onto a directory
#[derive(Debug, Clone, Copy, Default)]
pub struct UndoRedoEngine {
    policy: ReplayFailurePolicy,
}

impl UndoRedoEngine {
    /// Create an engine with the given failure policy
    pub fn new(policy: ReplayFailurePolicy) -> Self {
        UndoRedoEngine { policy }
    }

    /// The configured failure policy
    pub fn policy(&self) -> ReplayFailurePolicy {
        self.policy
    }

    /// Revert the most recent applied record
    pub fn undo<S: HistoryStore>(
        &self,
        journal: &mut Journal<S>,
        dir: &Path,
    ) -> Result<ReplayReport, HistoryError> {
        self.replay(journal, dir, Stack::Undo)
    }

    /// Re-apply the most recent undone record
    pub fn redo<S: HistoryStore>(
        &self,
        journal: &mut Journal<S>,
        dir: &Path,
    ) -> Result<ReplayReport, HistoryError> {
        self.replay(journal, dir, Stack::Redo)
    }

    fn replay<S: HistoryStore>(
        &self,
        journal: &mut Journal<S>,
        dir: &Path,
        from: Stack,
    ) -> Result<ReplayReport, HistoryError> {
        scan::ensure_directory(dir)?;

        let history = journal.history_mut();
        let record = match from {
            Stack::Undo => history.pop_undo(),
            Stack::Redo => history.pop_redo(),
        }
        .ok_or(HistoryError::EmptyHistory(from))?;

        info!(%from, record = %record, dir = %dir.display(), "replaying");
        let changes = match from {
            Stack::Undo => inverse_changes(&record),
            Stack::Redo => forward_changes(&record),
        };
        let outcomes = apply_all(dir, changes);
        let rename_failed = !record.is_batch() && outcomes.iter().any(|o| !o.is_applied());

        let disposition = if !rename_failed {
            match from {
                Stack::Undo => history.push_redo(record.clone()),
                Stack::Redo => history.push_undo(record.clone()),
            }
            Disposition::Moved
        } else {
            match self.policy {
                ReplayFailurePolicy::Discard => {
                    warn!(%from, record = %record, "rename replay failed, record discarded");
                    Disposition::Discarded
                }
                ReplayFailurePolicy::Retain => {
                    warn!(%from, record = %record, "rename replay failed, record kept");
                    match from {
                        Stack::Undo => history.push_undo(record.clone()),
                        Stack::Redo => history.push_redo(record.clone()),
                    }
                    Disposition::Retained
                }
            }
        };

        let persist_error = match disposition {
            Disposition::Retained => None,
            Disposition::Moved | Disposition::Discarded => journal.persist().err(),
        };

        Ok(ReplayReport {
            from,
            record,
            outcomes,
            disposition,
            persist_error,
        })
    }
}

/// Changes that perform `record` again
fn forward_changes(record: &OperationRecord) -> Vec<FsChange> {
    match record {
        OperationRecord::Rename { old, new } => vec![FsChange::Rename {
            from: old.clone(),
            to: new.clone(),
        }],
        OperationRecord::CreateBatch { folders } => {
            folders.iter().cloned().map(FsChange::CreateFolder).collect()
        }
        OperationRecord::DeleteBatch { folders } => {
            folders.iter().cloned().map(FsChange::RemoveFolder).collect()
        }
    }
}

/// Changes that revert `record`, most recent item first
fn inverse_changes(record: &OperationRecord) -> Vec<FsChange> {
    match record {
        OperationRecord::Rename { old, new } => vec![FsChange::Rename {
            from: new.clone(),
            to: old.clone(),
        }],
        OperationRecord::CreateBatch { folders } => folders
            .iter()
            .rev()
            .cloned()
            .map(FsChange::RemoveFolder)
            .collect(),
        OperationRecord::DeleteBatch { folders } => folders
            .iter()
            .rev()
            .cloned()
            .map(FsChange::CreateFolder)
            .collect(),
    }
}
