//! Fixed-location vault file on the medium.
//!
//! The file name is chosen to look like operating-system clutter. That is
//! cosmetic; confidentiality comes from the encryption alone.
//!
//! The file is only ever replaced whole. There is no backup-then-swap, so an
//! interrupted write can lose the vault; callers retry the entire operation
//! from a fresh read.

use std::path::PathBuf;

use crate::{MediumError, MediumSlot};

/// Vault file name at the medium root
pub const VAULT_FILE_NAME: &str = ".fseventsd.";

/// Absolute path of the vault file on an acquired medium.
pub fn vault_path<S: MediumSlot>(slot: &S) -> PathBuf {
    slot.root_path().join(VAULT_FILE_NAME)
}

/// Cheap check that a vault file exists, done before any key derivation.
pub fn exists<S: MediumSlot>(slot: &S) -> Result<bool, MediumError> {
    slot.exists(&vault_path(slot))
}

/// Raw vault bytes, or `None` if no vault has been written to this medium.
pub fn read<S: MediumSlot>(slot: &S) -> Result<Option<Vec<u8>>, MediumError> {
    let blob = slot.read(&vault_path(slot))?;
    tracing::debug!(bytes = blob.as_ref().map_or(0, Vec::len), found = blob.is_some(), "vault file read");
    Ok(blob)
}

/// Replace the vault file with `blob`.
pub fn write<S: MediumSlot>(slot: &S, blob: &[u8]) -> Result<(), MediumError> {
    slot.write(&vault_path(slot), blob)?;
    tracing::debug!(bytes = blob.len(), "vault file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{Medium, medium::MemoryMedium};

    #[test]
    fn vault_lives_at_fixed_obscured_path() {
        let medium = MemoryMedium::new(b"id".to_vec());
        let slot = medium.acquire().unwrap();

        assert_eq!(vault_path(&slot), Path::new("/sd/.fseventsd."));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let medium = MemoryMedium::new(b"id".to_vec());
        let slot = medium.acquire().unwrap();

        assert!(!exists(&slot).unwrap());
        assert_eq!(read(&slot).unwrap(), None);
    }

    #[test]
    fn write_replaces_whole_file() {
        let medium = MemoryMedium::new(b"id".to_vec());
        let slot = medium.acquire().unwrap();

        write(&slot, b"first version, long").unwrap();
        write(&slot, b"second").unwrap();

        assert!(exists(&slot).unwrap());
        assert_eq!(read(&slot).unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn ejected_medium_is_reported_as_missing() {
        let medium = MemoryMedium::new(b"id".to_vec());
        let slot = medium.acquire().unwrap();
        medium.eject();

        assert_eq!(write(&slot, b"data"), Err(MediumError::Missing));
        assert_eq!(read(&slot), Err(MediumError::Missing));
    }
}
