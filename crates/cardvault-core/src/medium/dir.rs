//! Directory-backed medium for mounted removable storage.
//!
//! The mount directory stands in for the card slot: if the directory is gone
//! the medium is missing. The medium identifies itself through a small
//! [`VOLUME_ID_FILE`] written once by [`DirMedium::initialize`]; its SHA-256
//! digest is the identity hash.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};

use super::{Medium, MediumError, MediumSlot};

/// Name of the identity file at the medium root
pub const VOLUME_ID_FILE: &str = ".volume-id";

/// Medium mounted at a directory.
#[derive(Debug, Clone)]
pub struct DirMedium {
    root: PathBuf,
}

impl DirMedium {
    /// Medium mounted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write the identity file if the medium does not have one yet.
    ///
    /// Returns `true` if a new identity was written. An existing identity is
    /// never replaced: doing so would orphan any vault already on the medium.
    pub fn initialize(&self, volume_id: &[u8]) -> Result<bool, MediumError> {
        let slot = self.acquire()?;
        let path = slot.root.join(VOLUME_ID_FILE);

        if slot.exists(&path)? {
            return Ok(false);
        }

        slot.write(&path, volume_id)?;
        tracing::info!(root = %slot.root.display(), "medium identity written");
        Ok(true)
    }
}

impl Medium for DirMedium {
    type Slot = DirSlot;

    fn acquire(&self) -> Result<DirSlot, MediumError> {
        if !self.root.is_dir() {
            tracing::debug!(root = %self.root.display(), "medium not mounted");
            return Err(MediumError::Missing);
        }
        Ok(DirSlot { root: self.root.clone() })
    }
}

/// Acquired directory medium.
#[derive(Debug)]
pub struct DirSlot {
    root: PathBuf,
}

impl DirSlot {
    /// Classify an I/O error, reporting `Missing` if the mount vanished.
    fn classify(&self, err: &io::Error) -> MediumError {
        if self.root.is_dir() { MediumError::Io(err.to_string()) } else { MediumError::Missing }
    }
}

impl MediumSlot for DirSlot {
    fn root_path(&self) -> &Path {
        &self.root
    }

    fn identity_hash(&self) -> Result<Vec<u8>, MediumError> {
        let path = self.root.join(VOLUME_ID_FILE);
        let Some(volume_id) = self.read(&path)? else {
            return Err(MediumError::Io(format!("no {VOLUME_ID_FILE} on medium")));
        };

        Ok(Sha256::digest(&volume_id).to_vec())
    }

    fn exists(&self, path: &Path) -> Result<bool, MediumError> {
        match fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if self.root.is_dir() { Ok(false) } else { Err(MediumError::Missing) }
            },
            Err(err) => Err(self.classify(&err)),
        }
    }

    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, MediumError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if self.root.is_dir() { Ok(None) } else { Err(MediumError::Missing) }
            },
            Err(err) => Err(self.classify(&err)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), MediumError> {
        fs::write(path, contents).map_err(|err| self.classify(&err))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_directory_is_missing_medium() {
        let dir = tempdir().unwrap();
        let medium = DirMedium::new(dir.path().join("not-mounted"));

        assert_eq!(medium.acquire().unwrap_err(), MediumError::Missing);
    }

    #[test]
    fn identity_requires_initialization() {
        let dir = tempdir().unwrap();
        let medium = DirMedium::new(dir.path());

        let slot = medium.acquire().unwrap();
        assert!(matches!(slot.identity_hash(), Err(MediumError::Io(_))));

        drop(slot);
        assert!(medium.initialize(b"card-0001").unwrap());

        let slot = medium.acquire().unwrap();
        let identity = slot.identity_hash().unwrap();
        assert_eq!(identity.len(), 32);
        assert_eq!(identity, Sha256::digest(b"card-0001").to_vec());
    }

    #[test]
    fn initialize_never_replaces_identity() {
        let dir = tempdir().unwrap();
        let medium = DirMedium::new(dir.path());

        assert!(medium.initialize(b"first").unwrap());
        assert!(!medium.initialize(b"second").unwrap());

        let slot = medium.acquire().unwrap();
        assert_eq!(slot.identity_hash().unwrap(), Sha256::digest(b"first").to_vec());
    }

    #[test]
    fn read_write_replaces_contents() {
        let dir = tempdir().unwrap();
        let medium = DirMedium::new(dir.path());
        let slot = medium.acquire().unwrap();
        let path = slot.root_path().join("file");

        assert_eq!(slot.read(&path).unwrap(), None);
        assert!(!slot.exists(&path).unwrap());

        slot.write(&path, b"longer contents").unwrap();
        slot.write(&path, b"short").unwrap();

        assert!(slot.exists(&path).unwrap());
        assert_eq!(slot.read(&path).unwrap(), Some(b"short".to_vec()));
    }

    #[test]
    fn removal_mid_session_is_missing() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("card");
        fs::create_dir(&root).unwrap();

        let medium = DirMedium::new(&root);
        let slot = medium.acquire().unwrap();
        fs::remove_dir_all(&root).unwrap();

        let path = slot.root_path().join("file");
        assert_eq!(slot.read(&path), Err(MediumError::Missing));
        assert_eq!(slot.write(&path, b"x"), Err(MediumError::Missing));
    }
}
