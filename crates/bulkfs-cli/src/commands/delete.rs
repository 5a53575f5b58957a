// Delete empty subfolders

use std::path::PathBuf;

use bulkfs_history::DeleteBatchExecutor;

use super::{run_bulk, Command, CommandContext};
use crate::error::CliResult;

/// Remove every empty direct subfolder of a directory
pub struct DeleteCommand {
    pub directory: PathBuf,
    pub preview: bool,
}

impl DeleteCommand {
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            preview: false,
        }
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}

impl Command for DeleteCommand {
    fn execute(&self, ctx: &mut CommandContext) -> CliResult<()> {
        let executor = DeleteBatchExecutor::new(&self.directory);
        run_bulk(ctx, &executor, self.preview)
    }
}
