//! Error types for the minter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, MinterError>;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum MinterError {
    /// Input file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not valid JSON for its expected shape
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Input file parsed but holds unusable values
    #[error("Invalid configuration in {}: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },

    /// Contract address given on the command line is malformed
    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),

    /// Operator prompt failed (closed stdin, no terminal)
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Contract call error
    #[error("Contract call error: {0}")]
    ContractCall(String),

    /// Transaction error
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Decoding error
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MinterError {
    /// Startup failures: the run must stop before any wallet is touched.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MinterError::Read { .. }
                | MinterError::Parse { .. }
                | MinterError::InvalidConfig { .. }
                | MinterError::InvalidAddress(_)
                | MinterError::Prompt(_)
        )
    }

    pub(crate) fn invalid_config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        MinterError::InvalidConfig {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
