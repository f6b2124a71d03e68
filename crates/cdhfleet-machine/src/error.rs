//! Machine-boundary error types.

use std::path::PathBuf;

/// Errors that can occur while talking to a provisioned machine.
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    /// The remote file does not exist. Expected for optional diagnostics.
    #[error("remote file not found: {0}")]
    NotFound(PathBuf),

    /// The remote side refused access to the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The machine could not be reached at all.
    #[error("machine unreachable: {0}")]
    Unreachable(String),

    /// The operation ran past its deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Remote command execution failed before producing an exit code.
    #[error("exec failed: {command}: {message}")]
    Exec { command: String, message: String },

    /// A local I/O error while writing the fetched file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type MachineResult<T> = std::result::Result<T, MachineError>;
