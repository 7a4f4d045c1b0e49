//! CLI error type.

use std::io;

use cardvault_core::{MediumError, VaultError};
use thiserror::Error;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Vault operation failed
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// Medium could not be prepared
    #[error(transparent)]
    Medium(#[from] MediumError),

    /// Terminal I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Empty passphrase given to `save`
    #[error("passphrase must not be empty")]
    EmptySecret,

    /// Vault command run without `--device-secret`
    #[error("--device-secret is required for this command")]
    MissingDeviceSecret,
}
