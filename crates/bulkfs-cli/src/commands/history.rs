// Show the recorded operations

use bulkfs_history::OperationRecord;

use super::{Command, CommandContext};
use crate::error::CliResult;
use crate::output::OutputStyle;

/// List both history stacks, most recent first
pub struct HistoryCommand;

impl HistoryCommand {
    pub fn new() -> Self {
        Self
    }

    fn format_stack(style: &OutputStyle, title: &str, records: &[OperationRecord]) -> String {
        let mut lines = vec![style.section(title)];
        if records.is_empty() {
            lines.push(style.list_item("(empty)"));
        }
        for (i, record) in records.iter().rev().enumerate() {
            lines.push(style.numbered_item(i + 1, &record.to_string()));
        }
        lines.join("\n")
    }
}

impl Default for HistoryCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for HistoryCommand {
    fn execute(&self, ctx: &mut CommandContext) -> CliResult<()> {
        let style = ctx.style;
        let file = ctx.settings.history_file.display().to_string();
        let history = ctx.journal.load();

        println!("{}", style.key_value("History file", &file));
        println!(
            "{}",
            Self::format_stack(&style, "Undo stack", history.undo_stack())
        );
        println!(
            "{}",
            Self::format_stack(&style, "Redo stack", history.redo_stack())
        );
        Ok(())
    }
}
