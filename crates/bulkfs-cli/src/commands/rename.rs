// Rename every entry matching a pattern

use std::path::PathBuf;

use bulkfs_history::RenameExecutor;

use super::{run_bulk, Command, CommandContext};
use crate::error::CliResult;

/// Rename entries of a directory by regex
pub struct RenameCommand {
    pub directory: PathBuf,
    pub pattern: String,
    pub replacement: String,
    pub preview: bool,
}

impl RenameCommand {
    pub fn new(directory: PathBuf, pattern: String, replacement: String) -> Self {
        Self {
            directory,
            pattern,
            replacement,
            preview: false,
        }
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}

impl Command for RenameCommand {
    fn execute(&self, ctx: &mut CommandContext) -> CliResult<()> {
        let executor =
            RenameExecutor::new(&self.directory, &self.pattern, self.replacement.as_str())?;
        run_bulk(ctx, &executor, self.preview)
    }
}
