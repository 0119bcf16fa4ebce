//! Error types for the session engine.
//!
//! Every variant is recoverable: the command interpreter renders them as
//! terminal output and the session carries on.

use thiserror::Error;

/// Errors raised by workspace, package, and dispatch operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A file or package does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// A write or delete targeted a protected file.
    #[error("'{0}' is read-only and cannot be modified")]
    ProtectedFile(String),

    /// The operation would break a workspace invariant.
    #[error("{0}")]
    InvalidOperation(String),

    /// The command name is not in the dispatch table.
    #[error("Command not found: {0}. Type 'help' for available commands.")]
    UnrecognizedCommand(String),

    /// A file with this name already exists.
    #[error("'{0}' already exists")]
    DuplicateName(String),
}

impl SessionError {
    pub fn file_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "file",
            name: name.into(),
        }
    }

    pub fn package_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "package",
            name: name.into(),
        }
    }
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SessionError::file_not_found("a.py").to_string(),
            "file 'a.py' not found"
        );
        assert_eq!(
            SessionError::ProtectedFile("config.json".into()).to_string(),
            "'config.json' is read-only and cannot be modified"
        );
        assert_eq!(
            SessionError::UnrecognizedCommand("foo".into()).to_string(),
            "Command not found: foo. Type 'help' for available commands."
        );
    }
}
