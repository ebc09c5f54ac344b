//! CLI-specific error types and exit code mapping

use hookline_core::error::HooklineError;
use hookline_timeline::{CommandError, ParseError, TimelineError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Captured output could not be turned into timelines.
    #[error("parse error: {0}")]
    Parse(String),

    /// One or more checks did not hold.
    #[error("verification failed: {failed} of {total} check(s) failed")]
    VerificationFailed {
        /// Number of failed checks
        failed: usize,
        /// Number of checks run
        total: usize,
    },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from hookline-core.
    #[error("{0}")]
    Core(#[from] HooklineError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                       |
    /// |------|-------------------------------|
    /// | 0    | Success                       |
    /// | 1    | General / command error       |
    /// | 2    | Configuration error           |
    /// | 3    | Verification failed           |
    /// | 4    | Captured output did not parse |
    /// | 10   | IO error                      |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(HooklineError::Config(_)) => 2,
            Self::VerificationFailed { .. } | Self::Core(HooklineError::Verification(_)) => 3,
            Self::Parse(_) | Self::Core(HooklineError::Parse(_)) => 4,
            Self::Io(_) | Self::Core(HooklineError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<CommandError> for CliError {
    fn from(e: CommandError) -> Self {
        Self::Command(e.to_string())
    }
}

impl From<TimelineError> for CliError {
    fn from(e: TimelineError) -> Self {
        match e {
            TimelineError::Parse(e) => e.into(),
            TimelineError::Command(e) => e.into(),
            TimelineError::Config { field, reason } => Self::Config(format!("{field}: {reason}")),
            TimelineError::Io(e) => Self::Io(e),
            other => Self::Core(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_verification_failed() {
        let err = CliError::VerificationFailed {
            failed: 1,
            total: 3,
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "verification failed: 1 of 3 check(s) failed");
    }

    #[test]
    fn test_exit_code_parse_error() {
        let err: CliError = ParseError::NoEvents {
            container: "regular-1".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("no events for container regular-1"));
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_command_error() {
        let err: CliError = CommandError::InvalidName {
            name: "bad name".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_follows_core_category() {
        use hookline_core::error::ConfigError;
        let err: CliError = HooklineError::Config(ConfigError::FileNotFound {
            path: "hookline.toml".to_owned(),
        })
        .into();
        assert!(matches!(err, CliError::Core(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_from_timeline_config_error() {
        let err: CliError = TimelineError::Config {
            field: "hook_sink".to_owned(),
            reason: "must be absolute".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("hook_sink"));
    }

    #[test]
    fn test_error_display_command() {
        let err = CliError::Command("execution failed".to_owned());
        assert_eq!(format!("{}", err), "execution failed");
    }
}
