//! Single-item filesystem actions inside a target directory

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{ItemAction, ItemFailure};
use crate::record::is_entry_name;

/// One filesystem action on one entry of the target directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsChange {
    /// Move entry `from` to `to`
    Rename {
        /// Current name
        from: String,
        /// Name after the change
        to: String,
    },
    /// Create an empty folder
    CreateFolder(String),
    /// Remove an empty folder
    RemoveFolder(String),
}

impl FsChange {
    /// The action this change performs
    pub fn action(&self) -> ItemAction {
        match self {
            FsChange::Rename { .. } => ItemAction::Rename,
            FsChange::CreateFolder(_) => ItemAction::Create,
            FsChange::RemoveFolder(_) => ItemAction::Remove,
        }
    }

    /// Name of the entry the change starts from
    pub fn subject(&self) -> &str {
        match self {
            FsChange::Rename { from, .. } => from,
            FsChange::CreateFolder(name) | FsChange::RemoveFolder(name) => name,
        }
    }

    /// Entry names the change touches
    fn names(&self) -> [&str; 2] {
        match self {
            FsChange::Rename { from, to } => [from.as_str(), to.as_str()],
            FsChange::CreateFolder(name) | FsChange::RemoveFolder(name) => [name.as_str(); 2],
        }
    }

    /// Apply the change inside `dir`.
    ///
    /// Only direct entries of `dir` are touched: a name that is empty, `.`,
    /// `..` or holds a separator fails with `InvalidInput`. A rename never
    /// replaces an existing entry, so every applied rename can be moved back.
    pub fn apply(&self, dir: &Path) -> Result<(), ItemFailure> {
        let result = match self.names().into_iter().find(|name| !is_entry_name(name)) {
            Some(name) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not an entry of the directory", name),
            )),
            None => self.apply_in(dir),
        };

        match result {
            Ok(()) => {
                info!(change = %self, dir = %dir.display(), "applied");
                Ok(())
            }
            Err(e) => {
                let failure = ItemFailure::new(self.action(), self.subject(), e);
                warn!(dir = %dir.display(), error = %failure, "item failed");
                Err(failure)
            }
        }
    }

    fn apply_in(&self, dir: &Path) -> io::Result<()> {
        match self {
            FsChange::Rename { from, to } => {
                let target = dir.join(to);
                if target.symlink_metadata().is_ok() {
                    Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("'{}' already exists", to),
                    ))
                } else {
                    fs::rename(dir.join(from), target)
                }
            }
            FsChange::CreateFolder(name) => fs::create_dir(dir.join(name)),
            FsChange::RemoveFolder(name) => fs::remove_dir(dir.join(name)),
        }
    }
}

impl fmt::Display for FsChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsChange::Rename { from, to } => write!(f, "{} -> {}", from, to),
            FsChange::CreateFolder(name) => write!(f, "+ {}", name),
            FsChange::RemoveFolder(name) => write!(f, "- {}", name),
        }
    }
}

/// Result of applying one [`FsChange`]
#[derive(Debug)]
pub struct ItemOutcome {
    /// The change that was attempted
    pub change: FsChange,
    /// `Err` when the filesystem refused it
    pub result: Result<(), ItemFailure>,
}

impl ItemOutcome {
    /// Whether the change was applied
    pub fn is_applied(&self) -> bool {
        self.result.is_ok()
    }
}

/// Apply each change independently; a failure never stops the rest.
pub fn apply_all(dir: &Path, changes: impl IntoIterator<Item = FsChange>) -> Vec<ItemOutcome> {
    changes
        .into_iter()
        .map(|change| {
            let result = change.apply(dir);
            ItemOutcome { change, result }
        })
        .collect()
}
