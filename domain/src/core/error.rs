//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Step has {tasks} tasks but {results} task results were supplied")]
    TaskResultMismatch { tasks: usize, results: usize },

    #[error("Extension limit of {limit} entries reached (rejected key '{key}')")]
    ExtensionLimit { key: String, limit: usize },

    #[error("Extension key '{0}' is reserved for a built-in field")]
    ReservedExtensionKey(String),

    #[error("Invalid planning mode: {0}")]
    InvalidMode(String),

    #[error("Invalid output format: {0}")]
    InvalidOutputFormat(String),
}
