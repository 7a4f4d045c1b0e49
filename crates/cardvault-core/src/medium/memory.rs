//! In-memory medium
//!
//! Holds the card's files in a shared map so tests can eject, reinsert or
//! swap the card underneath a running session.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use super::{Medium, MediumError, MediumSlot};

/// In-memory medium for testing and simulation.
///
/// Clones share the same card, so a test can keep one handle to eject,
/// reinsert or swap the card while a session holds another. Uses
/// `lock().expect()` which panics if the mutex is poisoned - acceptable for
/// test code.
#[derive(Debug, Clone)]
pub struct MemoryMedium {
    inner: Arc<Mutex<MemoryMediumInner>>,
}

#[derive(Debug)]
struct MemoryMediumInner {
    /// Whether the card is in the slot
    inserted: bool,
    /// Identity hash reported by the card
    identity: Vec<u8>,
    /// File contents keyed by absolute path
    files: HashMap<PathBuf, Vec<u8>>,
    /// Number of successful writes
    writes: usize,
}

impl MemoryMedium {
    /// Mount point reported by every in-memory card
    pub const ROOT: &'static str = "/sd";

    /// Inserted card with the given identity and no files.
    pub fn new(identity: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryMediumInner {
                inserted: true,
                identity: identity.into(),
                files: HashMap::new(),
                writes: 0,
            })),
        }
    }

    /// Remove the card from the slot.
    pub fn eject(&self) {
        self.lock().inserted = false;
    }

    /// Put the card back.
    pub fn insert(&self) {
        self.lock().inserted = true;
    }

    /// Whether the card is currently in the slot.
    pub fn is_inserted(&self) -> bool {
        self.lock().inserted
    }

    /// Replace the card with a different physical card (new identity, no files).
    pub fn swap_card(&self, identity: impl Into<Vec<u8>>) {
        let mut inner = self.lock();
        inner.identity = identity.into();
        inner.files.clear();
    }

    /// Raw contents of a file, bypassing the slot.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock().files.get(path.as_ref()).cloned()
    }

    /// Overwrite a file directly, bypassing the slot.
    pub fn put_file(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.lock().files.insert(path.into(), contents.into());
    }

    /// Number of successful writes.
    ///
    /// Useful for checking that failed operations left the card untouched.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for test
    /// code.
    #[allow(clippy::expect_used)]
    fn lock(&self) -> MutexGuard<'_, MemoryMediumInner> {
        self.inner.lock().expect("Mutex poisoned")
    }

    fn inserted(&self) -> Result<MutexGuard<'_, MemoryMediumInner>, MediumError> {
        let inner = self.lock();
        if inner.inserted { Ok(inner) } else { Err(MediumError::Missing) }
    }
}

impl Medium for MemoryMedium {
    type Slot = MemorySlot;

    fn acquire(&self) -> Result<MemorySlot, MediumError> {
        drop(self.inserted()?);
        Ok(MemorySlot { medium: self.clone(), root: PathBuf::from(Self::ROOT) })
    }
}

/// Acquired in-memory card.
#[derive(Debug)]
pub struct MemorySlot {
    medium: MemoryMedium,
    root: PathBuf,
}

impl MediumSlot for MemorySlot {
    fn root_path(&self) -> &Path {
        &self.root
    }

    fn identity_hash(&self) -> Result<Vec<u8>, MediumError> {
        Ok(self.medium.inserted()?.identity.clone())
    }

    fn exists(&self, path: &Path) -> Result<bool, MediumError> {
        Ok(self.medium.inserted()?.files.contains_key(path))
    }

    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, MediumError> {
        Ok(self.medium.inserted()?.files.get(path).cloned())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), MediumError> {
        let mut inner = self.medium.inserted()?;
        inner.files.insert(path.to_path_buf(), contents.to_vec());
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ejected_card_cannot_be_acquired() {
        let medium = MemoryMedium::new(b"id".to_vec());
        medium.eject();

        assert_eq!(medium.acquire().unwrap_err(), MediumError::Missing);

        medium.insert();
        assert!(medium.acquire().is_ok());
    }

    #[test]
    fn ejecting_during_slot_fails_operations() {
        let medium = MemoryMedium::new(b"id".to_vec());
        let slot = medium.acquire().unwrap();
        let path = slot.root_path().join("f");

        medium.eject();

        assert_eq!(slot.write(&path, b"x"), Err(MediumError::Missing));
        assert_eq!(slot.identity_hash(), Err(MediumError::Missing));
        assert_eq!(medium.write_count(), 0);
    }

    #[test]
    fn clones_share_files() {
        let medium = MemoryMedium::new(b"id".to_vec());
        let other = medium.clone();

        let slot = medium.acquire().unwrap();
        let path = slot.root_path().join("f");
        slot.write(&path, b"data").unwrap();

        assert_eq!(other.file(&path), Some(b"data".to_vec()));
        assert_eq!(other.write_count(), 1);
    }

    #[test]
    fn swap_card_changes_identity_and_clears_files() {
        let medium = MemoryMedium::new(b"first".to_vec());
        medium.put_file("/sd/f", b"data".to_vec());

        medium.swap_card(b"second".to_vec());

        let slot = medium.acquire().unwrap();
        assert_eq!(slot.identity_hash().unwrap(), b"second".to_vec());
        assert_eq!(medium.file("/sd/f"), None);
    }
}
