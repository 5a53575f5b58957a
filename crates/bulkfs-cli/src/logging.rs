// Logging and verbosity control

use tracing_subscriber::filter::LevelFilter;

use crate::error::{CliError, CliResult};

/// Verbosity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Quiet mode - errors only, no per-item lines
    Quiet = 0,
    /// Normal mode - standard output
    Normal = 1,
    /// Verbose mode - debug logging
    Verbose = 2,
}

impl VerbosityLevel {
    /// Resolve the level from CLI flags; `quiet` wins over `verbose`
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            VerbosityLevel::Quiet
        } else if verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Log filter for this level, starting from the configured one
    pub fn filter(&self, configured: &str) -> CliResult<LevelFilter> {
        match self {
            VerbosityLevel::Quiet => Ok(LevelFilter::ERROR),
            VerbosityLevel::Verbose => Ok(LevelFilter::DEBUG),
            VerbosityLevel::Normal => {
                configured
                    .parse::<LevelFilter>()
                    .map_err(|e| CliError::InvalidSetting {
                        key: "log_level".to_string(),
                        message: e.to_string(),
                    })
            }
        }
    }

    /// Whether per-item status lines are printed
    pub fn shows_items(&self) -> bool {
        *self >= VerbosityLevel::Normal
    }
}

/// Install the stderr subscriber.
///
/// A second call is a no-op.
pub fn init_logging(level: LevelFilter) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(VerbosityLevel::from_flags(false, false), VerbosityLevel::Normal);
        assert_eq!(VerbosityLevel::from_flags(true, false), VerbosityLevel::Verbose);
        assert_eq!(VerbosityLevel::from_flags(false, true), VerbosityLevel::Quiet);
        assert_eq!(VerbosityLevel::from_flags(true, true), VerbosityLevel::Quiet);
    }

    #[test]
    fn test_filter_uses_configured_level() {
        let filter = VerbosityLevel::Normal.filter("info").unwrap();
        assert_eq!(filter, LevelFilter::INFO);
    }

    #[test]
    fn test_filter_flags_override_configuration() {
        assert_eq!(VerbosityLevel::Verbose.filter("warn").unwrap(), LevelFilter::DEBUG);
        assert_eq!(VerbosityLevel::Quiet.filter("trace").unwrap(), LevelFilter::ERROR);
    }

    #[test]
    fn test_filter_rejects_unknown_level() {
        let result = VerbosityLevel::Normal.filter("chatty");
        assert!(matches!(result, Err(CliError::InvalidSetting { .. })));
    }

    #[test]
    fn test_shows_items() {
        assert!(!VerbosityLevel::Quiet.shows_items());
        assert!(VerbosityLevel::Normal.shows_items());
        assert!(VerbosityLevel::Verbose.shows_items());
    }
}
