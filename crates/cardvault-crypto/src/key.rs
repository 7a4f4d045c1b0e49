//! Vault key derivation using HKDF
//!
//! # Security Properties
//!
//! - Medium binding: a different medium identity yields an unrelated key
//! - Device binding: a different device secret yields an unrelated key
//! - Determinism: the same pair always yields the same key, so a vault written
//!   earlier can be reopened later on the same device and medium

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::CipherError;

/// Size of a vault key in bytes
pub const KEY_SIZE: usize = 32;

/// Label used for medium key derivation
const MEDIUM_KEY_LABEL: &[u8] = b"cardvaultMediumV1";

/// Label used to stretch raw device secret material
const DEVICE_KEY_LABEL: &[u8] = b"cardvaultDeviceV1";

/// A 32-byte symmetric key for the vault blob cipher.
///
/// Lives for one medium session and is wiped when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultKey {
    key: [u8; KEY_SIZE],
}

impl VaultKey {
    /// Wrap raw key bytes.
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Copy key bytes out of a slice, rejecting any length other than 32.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CipherError> {
        let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CipherError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self { key })
    }

    /// 32-byte key for the XChaCha20 keystream.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaultKey(<redacted>)")
    }
}

// Implement Drop to zeroize key material
impl Drop for VaultKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Derive the per-medium encryption key from device secret material.
///
/// `salt` is the medium identity hash. The device secret is used as HKDF input
/// keying material and the medium identity as HKDF salt, so the output is
/// bound to both.
pub fn derive_medium_key(device_secret: &[u8], salt: &[u8]) -> VaultKey {
    let hkdf = Hkdf::<Sha256>::new(Some(salt), device_secret);

    let mut key = [0u8; KEY_SIZE];
    let Ok(()) = hkdf.expand(MEDIUM_KEY_LABEL, &mut key) else {
        unreachable!("32 bytes is a valid HKDF-SHA256 output length");
    };

    VaultKey { key }
}

/// Stretch arbitrary-length raw secret material into a 32-byte device secret.
///
/// Used when the device secret is loaded from a file of unknown size.
pub fn derive_device_key(raw_material: &[u8]) -> [u8; KEY_SIZE] {
    let hkdf = Hkdf::<Sha256>::new(None, raw_material);

    let mut seed = [0u8; KEY_SIZE];
    let Ok(()) = hkdf.expand(DEVICE_KEY_LABEL, &mut seed) else {
        unreachable!("32 bytes is a valid HKDF-SHA256 output length");
    };

    seed
}
