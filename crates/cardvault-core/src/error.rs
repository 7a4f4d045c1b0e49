//! Error types for vault operations.
//!
//! Lower layers (medium I/O, master secret, cipher, CBOR) are coalesced into
//! a small taxonomy at each component boundary. Callers decide whether a
//! failure is shown to the user or treated as "no vault".

use cardvault_crypto::CipherError;
use thiserror::Error;

use crate::{MediumError, OwnerId};

/// The vault key could not be derived.
///
/// Every failure in the derivation chain lands here. No partial key is ever
/// produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyUnavailable {
    /// Medium did not report a usable identity
    #[error("medium identity unavailable: {0}")]
    MediumIdentity(String),

    /// Master secret could not be opened or refused to derive
    #[error("master secret unavailable: {0}")]
    MasterSecret(String),

    /// Master secret returned key material of the wrong size
    #[error("derived key has {actual} bytes, expected 32")]
    InvalidLength {
        /// Length actually returned
        actual: usize,
    },
}

/// Vault bytes exist but cannot be turned back into records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecryptFailure {
    /// Cipher rejected the blob (too short)
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// Plaintext is not a valid record list (corruption or wrong key)
    #[error("malformed vault data: {0}")]
    Malformed(String),
}

/// The identity collaborator refused a restored secret.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct IdentityError {
    /// User-facing explanation
    pub reason: String,
}

impl IdentityError {
    /// Create a rejection with a user-facing reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Errors surfaced by vault sessions and menus.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// Key derivation failed; the feature is inactive for this medium
    #[error("vault key unavailable: {0}")]
    KeyUnavailable(#[from] KeyUnavailable),

    /// Removable medium is absent or was ejected mid-operation
    #[error("medium missing")]
    MediumMissing,

    /// Stored blob could not be decrypted or decoded
    #[error("vault unreadable: {0}")]
    Decrypt(#[from] DecryptFailure),

    /// Selected entry belongs to a different identity than the active one
    #[error("identity mismatch: entry belongs to {record}, active identity is {active}")]
    IdentityMismatch {
        /// Owner stored with the entry
        record: OwnerId,
        /// Identity currently active
        active: OwnerId,
    },

    /// No menu entry at the selected index
    #[error("no vault entry at index {index}")]
    NotFound {
        /// Requested index
        index: usize,
    },

    /// Identity collaborator rejected the secret
    #[error("secret rejected: {0}")]
    Rejected(#[from] IdentityError),

    /// Medium is present but a read or write failed
    #[error("storage failure: {0}")]
    Storage(String),

    /// Encoding or encryption of the record list failed
    #[error("internal error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Returns true if re-prompting for the medium and retrying can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::MediumMissing)
    }

    /// Returns true if this failure means "treat the vault as absent" on the
    /// read path rather than something to report.
    pub fn degrades_to_empty(&self) -> bool {
        match self {
            Self::KeyUnavailable(_) | Self::Decrypt(_) | Self::MediumMissing => true,

            Self::IdentityMismatch { .. }
            | Self::NotFound { .. }
            | Self::Rejected(_)
            | Self::Storage(_)
            | Self::Internal(_) => false,
        }
    }
}

impl From<MediumError> for VaultError {
    fn from(err: MediumError) -> Self {
        match err {
            MediumError::Missing => Self::MediumMissing,
            MediumError::Io(msg) => Self::Storage(msg),
        }
    }
}
