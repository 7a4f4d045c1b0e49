//! Removable storage abstraction.
//!
//! A [`Medium`] is acquired for the duration of one vault call, yielding a
//! [`MediumSlot`] that exposes the root path, the medium's identity and plain
//! file operations. Dropping the slot releases the medium. Nothing holds a
//! slot across a user prompt.
//!
//! Removal at any point inside the scoped window is reported as
//! [`MediumError::Missing`], distinct from other I/O failures, so callers can
//! ask for the medium again and restart the whole operation.

mod chaotic;
mod dir;
mod memory;

use std::path::Path;

pub use chaotic::{ChaoticMedium, ChaoticSlot};
pub use dir::{DirMedium, DirSlot, VOLUME_ID_FILE};
pub use memory::{MemoryMedium, MemorySlot};
use thiserror::Error;

/// Errors from medium access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediumError {
    /// Medium not inserted or removed mid-operation
    #[error("medium missing")]
    Missing,

    /// Medium present but the operation failed
    #[error("medium I/O error: {0}")]
    Io(String),
}

impl MediumError {
    /// Returns true if the user can fix this by reinserting the medium.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Removable storage that can be acquired for a scoped operation.
pub trait Medium {
    /// Handle valid while the medium is acquired.
    type Slot: MediumSlot;

    /// Acquire the medium.
    ///
    /// Returns `Missing` if no medium is present.
    fn acquire(&self) -> Result<Self::Slot, MediumError>;
}

/// Operations available while a medium is acquired.
///
/// Paths passed to the file operations are absolute, built from
/// [`root_path`](MediumSlot::root_path).
pub trait MediumSlot {
    /// Mount point of the medium.
    fn root_path(&self) -> &Path;

    /// Stable identity hash of this physical medium.
    ///
    /// Used as derivation salt, so it must not change between sessions.
    fn identity_hash(&self) -> Result<Vec<u8>, MediumError>;

    /// Cheap existence check.
    fn exists(&self, path: &Path) -> Result<bool, MediumError>;

    /// Read an entire file. `None` if it does not exist.
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, MediumError>;

    /// Truncate and replace an entire file.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), MediumError>;
}
