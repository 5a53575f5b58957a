// Redo the most recently undone operation

use std::path::PathBuf;

use bulkfs_history::{ReplayFailurePolicy, Stack};

use super::{run_replay, Command, CommandContext};
use crate::error::CliResult;

/// Re-apply the top of the redo stack
pub struct RedoCommand {
    pub directory: PathBuf,
    /// Overrides the configured policy
    pub on_failure: Option<ReplayFailurePolicy>,
}

impl RedoCommand {
    pub fn new(directory: PathBuf, on_failure: Option<ReplayFailurePolicy>) -> Self {
        Self {
            directory,
            on_failure,
        }
    }
}

impl Command for RedoCommand {
    fn execute(&self, ctx: &mut CommandContext) -> CliResult<()> {
        run_replay(ctx, &self.directory, Stack::Redo, self.on_failure)
    }
}
