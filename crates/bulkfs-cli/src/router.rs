// Command routing and dispatch

use std::path::PathBuf;

use bulkfs_history::ReplayFailurePolicy;
use clap::{CommandFactory, Parser, Subcommand};

use crate::commands::*;
use crate::config::SettingsLoader;
use crate::error::CliResult;
use crate::logging::{init_logging, VerbosityLevel};

/// bulkfs - bulk rename, create and delete with undo
#[derive(Parser, Debug)]
#[command(name = "bulkfs")]
#[command(bin_name = "bulkfs")]
#[command(about = "Bulk rename, create and delete inside one directory, with undo and redo")]
#[command(
    long_about = "bulkfs: bulk filesystem operations inside a single directory.\n\nEvery rename, create and delete is recorded in a history file in the working directory, so it can be undone and redone later.\n\nExamples:\n  bulkfs rename ./photos 'img(\\d+)\\.png' 'photo_$1.png'\n  bulkfs create ./project 3\n  bulkfs delete ./project --preview\n  bulkfs undo ./project\n  bulkfs redo ./project"
)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// History file (default: operation_history.json in the working directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub history_file: Option<PathBuf>,

    /// Answer yes to the confirmation prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rename entries matching a regex
    #[command(about = "Rename every entry whose name matches a regex")]
    Rename {
        /// Target directory
        #[arg(value_name = "DIRECTORY")]
        directory: PathBuf,

        /// Regex searched in each entry name
        #[arg(value_name = "PATTERN", allow_hyphen_values = true)]
        pattern: String,

        /// Replacement text; `$1` and `${name}` refer to capture groups
        #[arg(value_name = "REPLACEMENT", allow_hyphen_values = true)]
        replacement: String,

        /// Show the planned renames without applying them
        #[arg(long)]
        preview: bool,
    },

    /// Create numbered folders
    #[command(about = "Create folders named 10_, 20_, ... in a directory")]
    Create {
        /// Target directory
        #[arg(value_name = "DIRECTORY")]
        directory: PathBuf,

        /// Number of folders
        #[arg(value_name = "COUNT")]
        count: usize,

        /// Show the planned folders without creating them
        #[arg(long)]
        preview: bool,
    },

    /// Delete empty subfolders
    #[command(about = "Delete the empty direct subfolders of a directory")]
    Delete {
        /// Target directory
        #[arg(value_name = "DIRECTORY")]
        directory: PathBuf,

        /// Show the planned deletions without applying them
        #[arg(long)]
        preview: bool,
    },

    /// Undo the last operation
    #[command(about = "Undo the most recent operation")]
    Undo {
        /// Target directory
        #[arg(value_name = "DIRECTORY")]
        directory: PathBuf,

        /// What to do with a rename that cannot be reverted (discard, retain)
        #[arg(long, value_name = "POLICY")]
        on_failure: Option<ReplayFailurePolicy>,
    },

    /// Redo the last undone operation
    #[command(about = "Redo the most recently undone operation")]
    Redo {
        /// Target directory
        #[arg(value_name = "DIRECTORY")]
        directory: PathBuf,

        /// What to do with a rename that cannot be re-applied (discard, retain)
        #[arg(long, value_name = "POLICY")]
        on_failure: Option<ReplayFailurePolicy>,
    },

    /// Show recorded operations
    #[command(about = "List the undo and redo stacks")]
    History,
}

/// Route and execute commands
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub fn route() -> CliResult<()> {
        let cli = Cli::parse();
        Self::execute(&cli)
    }

    /// Execute a command
    pub fn execute(cli: &Cli) -> CliResult<()> {
        let Some(command) = &cli.command else {
            Cli::command().print_help()?;
            println!();
            return Ok(());
        };

        let verbosity = VerbosityLevel::from_flags(cli.verbose, cli.quiet);
        let mut settings = SettingsLoader::new().load()?;
        init_logging(verbosity.filter(&settings.log_level)?);
        if let Some(path) = &cli.history_file {
            settings.history_file = path.clone();
        }
        tracing::debug!(?command, history_file = %settings.history_file.display(), "dispatching");

        let mut ctx = CommandContext::new(settings, verbosity, cli.yes);
        match command {
            Commands::Rename {
                directory,
                pattern,
                replacement,
                preview,
            } => {
                let cmd = RenameCommand::new(directory.clone(), pattern.clone(), replacement.clone())
                    .with_preview(*preview);
                cmd.execute(&mut ctx)
            }
            Commands::Create {
                directory,
                count,
                preview,
            } => {
                let cmd = CreateCommand::new(directory.clone(), *count).with_preview(*preview);
                cmd.execute(&mut ctx)
            }
            Commands::Delete { directory, preview } => {
                let cmd = DeleteCommand::new(directory.clone()).with_preview(*preview);
                cmd.execute(&mut ctx)
            }
            Commands::Undo {
                directory,
                on_failure,
            } => {
                let cmd = UndoCommand::new(directory.clone(), *on_failure);
                cmd.execute(&mut ctx)
            }
            Commands::Redo {
                directory,
                on_failure,
            } => {
                let cmd = RedoCommand::new(directory.clone(), *on_failure);
                cmd.execute(&mut ctx)
            }
            Commands::History => HistoryCommand::new().execute(&mut ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rename_with_global_flags() {
        let cli = Cli::try_parse_from([
            "bulkfs",
            "rename",
            "photos",
            r"img(\d+)\.png",
            "photo_$1.png",
            "--preview",
            "-y",
            "--history-file",
            "h.json",
        ])
        .unwrap();

        assert!(cli.yes);
        assert_eq!(cli.history_file, Some(PathBuf::from("h.json")));
        match cli.command {
            Some(Commands::Rename {
                directory,
                pattern,
                replacement,
                preview,
            }) => {
                assert_eq!(directory, PathBuf::from("photos"));
                assert_eq!(pattern, r"img(\d+)\.png");
                assert_eq!(replacement, "photo_$1.png");
                assert!(preview);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_undo_policy() {
        let cli = Cli::try_parse_from(["bulkfs", "undo", ".", "--on-failure", "retain"]).unwrap();
        match cli.command {
            Some(Commands::Undo { on_failure, .. }) => {
                assert_eq!(on_failure, Some(ReplayFailurePolicy::Retain));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Cli::try_parse_from(["bulkfs", "create", ".", "three"]).is_err());
        assert!(Cli::try_parse_from(["bulkfs", "undo", ".", "--on-failure", "maybe"]).is_err());
        assert!(Cli::try_parse_from(["bulkfs", "rename", "."]).is_err());
    }

    #[test]
    fn test_no_command_parses() {
        let cli = Cli::try_parse_from(["bulkfs"]).unwrap();
        assert!(cli.command.is_none());
    }
}
