// Create numbered folders

use std::path::PathBuf;

use bulkfs_history::CreateBatchExecutor;

use super::{run_bulk, Command, CommandContext};
use crate::error::CliResult;

/// Create `10_`, `20_`, ... folders in a directory
pub struct CreateCommand {
    pub directory: PathBuf,
    pub count: usize,
    pub preview: bool,
}

impl CreateCommand {
    pub fn new(directory: PathBuf, count: usize) -> Self {
        Self {
            directory,
            count,
            preview: false,
        }
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}

impl Command for CreateCommand {
    fn execute(&self, ctx: &mut CommandContext) -> CliResult<()> {
        let executor = CreateBatchExecutor::new(&self.directory, self.count);
        run_bulk(ctx, &executor, self.preview)
    }
}
