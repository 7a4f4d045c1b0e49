//! Device-bound master secret access.
//!
//! The vault never sees the master secret itself. It opens a short-lived
//! [`SecretHandle`] in bypass mode (no user password: saving and restoring
//! passphrases happens before the wallet is unlocked with one), asks it for
//! one salted key, and drops the handle.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use cardvault_crypto::{KEY_SIZE, derive_device_key, derive_medium_key};
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

/// Errors from the master-secret subsystem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MasterSecretError {
    /// Secret store is locked or refuses bypass access
    #[error("master secret locked")]
    Locked,

    /// Secret store is missing or unreadable
    #[error("master secret unavailable: {0}")]
    Unavailable(String),
}

/// Device master secret that can be opened for one derivation.
pub trait MasterSecret {
    /// Scoped accessor; released on drop.
    type Handle: SecretHandle;

    /// Open the secret without prior user authentication.
    fn open_bypass(&self) -> Result<Self::Handle, MasterSecretError>;
}

/// Open master-secret accessor.
pub trait SecretHandle {
    /// Derive an encryption key from the master secret and `salt`.
    ///
    /// Conforming implementations return exactly 32 bytes.
    fn encryption_key(&self, salt: &[u8]) -> Result<Zeroizing<Vec<u8>>, MasterSecretError>;
}

/// Master secret held as 32 bytes of device key material.
///
/// Wiped on drop. Loaded from a key file in the CLI; built from fixed bytes
/// in tests.
#[derive(Clone)]
pub struct DeviceSecret {
    seed: [u8; KEY_SIZE],
}

impl DeviceSecret {
    /// Device secret from raw material of any length.
    pub fn from_material(raw: &[u8]) -> Self {
        Self { seed: derive_device_key(raw) }
    }

    /// Load raw material from a key file.
    ///
    /// An empty file is rejected: it would silently give every device the
    /// same vault key.
    pub fn load(path: &Path) -> Result<Self, MasterSecretError> {
        let raw = Zeroizing::new(fs::read(path).map_err(|err| match err.kind() {
            io::ErrorKind::PermissionDenied => MasterSecretError::Locked,
            _ => MasterSecretError::Unavailable(format!("{}: {err}", path.display())),
        })?);

        if raw.is_empty() {
            return Err(MasterSecretError::Unavailable(format!("{} is empty", path.display())));
        }

        Ok(Self::from_material(&raw))
    }
}

impl std::fmt::Debug for DeviceSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DeviceSecret(<redacted>)")
    }
}

impl Drop for DeviceSecret {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

impl MasterSecret for DeviceSecret {
    type Handle = DeviceSecretHandle;

    fn open_bypass(&self) -> Result<DeviceSecretHandle, MasterSecretError> {
        Ok(DeviceSecretHandle { seed: self.seed })
    }
}

/// Device key file read on every bypass open.
///
/// Nothing touches the file until a key is needed, so a missing or
/// unreadable file surfaces through [`derive_key`](crate::derive_key) as
/// `KeyUnavailable` like any other locked master secret.
#[derive(Debug, Clone)]
pub struct DeviceKeyFile {
    path: PathBuf,
}

impl DeviceKeyFile {
    /// Key file at `path`; not read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MasterSecret for DeviceKeyFile {
    type Handle = DeviceSecretHandle;

    fn open_bypass(&self) -> Result<DeviceSecretHandle, MasterSecretError> {
        DeviceSecret::load(&self.path)?.open_bypass()
    }
}

/// Open handle on a [`DeviceSecret`]. Holds a copy of the seed until dropped.
pub struct DeviceSecretHandle {
    seed: [u8; KEY_SIZE],
}

impl SecretHandle for DeviceSecretHandle {
    fn encryption_key(&self, salt: &[u8]) -> Result<Zeroizing<Vec<u8>>, MasterSecretError> {
        let key = derive_medium_key(&self.seed, salt);
        Ok(Zeroizing::new(key.as_bytes().to_vec()))
    }
}

impl Drop for DeviceSecretHandle {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}
