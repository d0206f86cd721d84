//! Error types shared by every command.

use thiserror::Error;

/// Boxed error returned across port boundaries.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Convenience alias for results carrying [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can end a `bugz` invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or conflicting command-line arguments, reported by the parser.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// Arguments that parsed but cannot be acted on.
    #[error("invalid arguments: {0}")]
    Arguments(String),

    /// A value rejected before anything was sent to the tracker.
    #[error("{0}")]
    Validation(String),

    /// The tracker refused or could not perform an operation.
    #[error("{context}: {message}")]
    Remote {
        /// What was being attempted (`bug 12: update`).
        context: String,
        /// The tracker's own message.
        message: String,
    },

    /// The user aborted a prompt whose answer is required.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Missing or inconsistent configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Conflicting command or alias registration.
    #[error("registry error: {0}")]
    Registry(String),

    /// Local I/O failure.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap a port failure with the operation it interrupted.
    pub fn remote(context: impl Into<String>, err: &PortError) -> Self {
        Self::Remote {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// Process exit code for this error.
    ///
    /// Follows sysexits.h where a category fits.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(err) => u8::try_from(err.exit_code()).unwrap_or(2),
            Self::Arguments(_) => 2,
            Self::Config(_) | Self::Registry(_) => 78,
            Self::Io { .. } => 74,
            Self::Validation(_) | Self::Remote { .. } | Self::Cancelled(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_names_context_and_message() {
        let cause: PortError = "invalid user".into();
        let err = Error::remote("bug 2: update", &cause);
        assert_eq!(err.to_string(), "bug 2: update: invalid user");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn config_errors_use_ex_config() {
        assert_eq!(Error::Config("missing args: url".into()).exit_code(), 78);
    }
}
