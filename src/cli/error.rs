//! CLI-level errors (wraps domain and config errors)

use thiserror::Error;

use crate::domain::CategoryError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Category(#[from] CategoryError),

    #[error("line {line}: {source}")]
    Command {
        line: usize,
        #[source]
        source: CategoryError,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Parse { .. } => crate::exitcode::DATAERR,
            CliError::Config(_) => crate::exitcode::CONFIG,
            CliError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                crate::exitcode::NOINPUT
            }
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Category(_) | CliError::Command { .. } => crate::exitcode::SOFTWARE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Usage("x".into()).exit_code(), crate::exitcode::USAGE);
        let parse = CliError::Parse {
            line: 3,
            message: "unknown command 'fly'".into(),
        };
        assert_eq!(parse.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(parse.to_string(), "line 3: unknown command 'fly'");

        let missing = CliError::io(
            "read script",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(missing.exit_code(), crate::exitcode::NOINPUT);

        let failed = CliError::Command {
            line: 7,
            source: CategoryError::RootMove,
        };
        assert_eq!(failed.exit_code(), crate::exitcode::SOFTWARE);
        assert_eq!(failed.to_string(), "line 7: root category cannot be moved");
    }
}
