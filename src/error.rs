//! Error types for tree snapshots and patch calculation.

use thiserror::Error;

/// Errors raised by tree containers and the sortedness checks
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Cannot {operation}: tree is stopped")]
    Stopped { operation: &'static str },

    #[error("Cannot {operation}: tree has no filesystem root")]
    NoRoot { operation: &'static str },

    #[error("Entries are not sorted: expected {previous:?} < {current:?}")]
    Unsorted { previous: String, current: String },

    #[error("Duplicate entry path: {0}")]
    DuplicatePath(String),

    #[error("Entry mode does not match its path: {0}")]
    ModeMismatch(String),

    #[error("Path not found in tree: {0}")]
    NotFound(String),

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration and logging setup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_error_names_operation() {
        let err = TreeError::Stopped {
            operation: "write_file",
        };
        assert_eq!(err.to_string(), "Cannot write_file: tree is stopped");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TreeError = io.into();
        assert!(matches!(err, TreeError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }
}
