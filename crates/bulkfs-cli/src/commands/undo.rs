// Undo the most recent operation

use std::path::PathBuf;

use bulkfs_history::{ReplayFailurePolicy, Stack};

use super::{run_replay, Command, CommandContext};
use crate::error::CliResult;

/// Revert the top of the undo stack
pub struct UndoCommand {
    pub directory: PathBuf,
    /// Overrides the configured policy
    pub on_failure: Option<ReplayFailurePolicy>,
}

impl UndoCommand {
    pub fn new(directory: PathBuf, on_failure: Option<ReplayFailurePolicy>) -> Self {
        Self {
            directory,
            on_failure,
        }
    }
}

impl Command for UndoCommand {
    fn execute(&self, ctx: &mut CommandContext) -> CliResult<()> {
        run_replay(ctx, &self.directory, Stack::Undo, self.on_failure)
    }
}
