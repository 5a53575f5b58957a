#![warn(missing_docs)]

//! Operation history for bulkfs
//!
//! Records every bulk filesystem mutation as a reversible operation, keeps the
//! undo/redo stacks on disk, and replays them onto the target directory.

pub mod engine;
pub mod error;
pub mod executor;
pub mod fs_change;
pub mod history;
pub mod journal;
pub mod record;
pub mod scan;
pub mod store;

// Re-export public API
pub use engine::{Disposition, ReplayFailurePolicy, ReplayReport, UndoRedoEngine};
pub use error::{HistoryError, ItemAction, ItemFailure, Stack};
pub use executor::{
    run_mutation, Confirm, CreateBatchExecutor, DeleteBatchExecutor, MutationExecutor,
    MutationReport, RenameExecutor, RunMode,
};
pub use fs_change::{FsChange, ItemOutcome};
pub use history::History;
pub use journal::Journal;
pub use record::{is_entry_name, OperationRecord, RecordDecodeError};
pub use store::{HistoryStore, JsonFileStore, DEFAULT_HISTORY_FILE};
