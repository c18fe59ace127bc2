//! Error types for the portscope-core library.

use thiserror::Error;

/// Result type alias for portscope operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during port discovery and process management.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to execute a system command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Failed to parse command output.
    #[error("Failed to parse output: {0}")]
    ParseError(String),
}
