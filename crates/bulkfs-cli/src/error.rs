// CLI error types and exit codes

use bulkfs_history::HistoryError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("{failed} item(s) could not be processed")]
    ItemFailures { failed: usize },

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid setting '{key}': {message}")]
    InvalidSetting { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::History(HistoryError::DirectoryNotFound(path)) => {
                format!(
                    "Directory not found: {}\n\nCheck the path and try again.",
                    path.display()
                )
            }
            CliError::History(HistoryError::InvalidPattern(e)) => {
                format!("Invalid pattern: {}\n\nPatterns use Rust regex syntax.", e)
            }
            CliError::History(HistoryError::EmptyHistory(stack)) => {
                format!(
                    "Nothing to {}.\n\nRun 'bulkfs history' to see recorded operations.",
                    stack
                )
            }
            CliError::History(HistoryError::StoreCorrupt { path, reason }) => {
                format!(
                    "History file {} is corrupt: {}\n\nMove it away to start a fresh history.",
                    path.display(),
                    reason
                )
            }
            CliError::History(e) => e.to_string(),
            CliError::ItemFailures { failed } => {
                format!("{} item(s) could not be processed; see the messages above.", failed)
            }
            CliError::Config(e) => {
                format!("Configuration error: {}\n\nCheck bulkfs.toml and BULKFS_* variables.", e)
            }
            CliError::InvalidSetting { key, message } => {
                format!("Invalid setting '{}': {}", key, message)
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::History(e) => match e {
                HistoryError::DirectoryNotFound(_) => 3,
                HistoryError::NoMatch(_) => 4,
                HistoryError::UserCancelled => 5,
                HistoryError::EmptyHistory(_) => 6,
                HistoryError::InvalidPattern(_) => 8,
                HistoryError::StoreCorrupt { .. }
                | HistoryError::StoreUnwritable { .. }
                | HistoryError::Serialization(_)
                | HistoryError::Io(_) => 1,
            },
            CliError::ItemFailures { .. } => 7,
            CliError::Config(_) | CliError::InvalidSetting { .. } | CliError::Io(_) => 1,
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;
