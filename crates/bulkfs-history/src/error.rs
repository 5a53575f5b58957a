//! Error types for the history engine

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which of the two history stacks an operation addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stack {
    /// The stack of applied operations
    Undo,
    /// The stack of undone operations
    Redo,
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stack::Undo => write!(f, "undo"),
            Stack::Redo => write!(f, "redo"),
        }
    }
}

/// Errors that abort a whole command
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Target directory is missing or not a directory
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Nothing in the directory qualified for the operation
    #[error("Nothing to do: {0}")]
    NoMatch(String),

    /// The confirmation prompt was declined
    #[error("Operation cancelled by user")]
    UserCancelled,

    /// The rename pattern is not a valid regular expression
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Undo or redo requested with an empty stack
    #[error("Nothing to {0}")]
    EmptyHistory(Stack),

    /// The history file exists but cannot be parsed
    #[error("History file {} is corrupt: {reason}", .path.display())]
    StoreCorrupt {
        /// Location of the history file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// The history file could not be written
    #[error("Cannot write history file {}: {source}", .path.display())]
    StoreUnwritable {
        /// Location of the history file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl HistoryError {
    /// Create a new NoMatch error with context
    pub fn no_match(msg: impl Into<String>) -> Self {
        Self::NoMatch(msg.into())
    }

    /// Create a new StoreCorrupt error with context
    pub fn store_corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::StoreCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new StoreUnwritable error with context
    pub fn store_unwritable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::StoreUnwritable {
            path: path.into(),
            source,
        }
    }
}

/// The filesystem action an [`ItemFailure`] was attempting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    /// Renaming an entry
    Rename,
    /// Creating a folder
    Create,
    /// Removing a folder
    Remove,
}

impl fmt::Display for ItemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemAction::Rename => write!(f, "rename"),
            ItemAction::Create => write!(f, "create"),
            ItemAction::Remove => write!(f, "remove"),
        }
    }
}

/// A single item of a batch could not be applied.
///
/// This is an outcome, not a reason to stop: the rest of the batch still runs.
#[derive(Debug, Error)]
#[error("Cannot {action} '{name}': {source}")]
pub struct ItemFailure {
    /// What was attempted
    pub action: ItemAction,
    /// Entry name inside the target directory
    pub name: String,
    /// Underlying I/O failure
    #[source]
    pub source: io::Error,
}

impl ItemFailure {
    /// Create a new item failure
    pub fn new(action: ItemAction, name: impl Into<String>, source: io::Error) -> Self {
        Self {
            action,
            name: name.into(),
            source,
        }
    }

    /// The I/O error kind behind the failure
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}
