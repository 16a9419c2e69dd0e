//! Provider errors.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors raised while fetching diagnostic text.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider program could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Program name as configured.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The provider program exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    Status {
        /// Program name as configured.
        program: String,
        /// Exit status reported by the OS.
        status: ExitStatus,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// A text or report file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A report snapshot is not valid JSON for [`crate::VulkanReport`].
    #[error("invalid report {}: {source}", path.display())]
    Report {
        /// Snapshot path.
        path: PathBuf,
        /// Deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// No diagnostic text can be produced at all.
    #[error("diagnostic provider unavailable: {0}")]
    Unavailable(String),
}
