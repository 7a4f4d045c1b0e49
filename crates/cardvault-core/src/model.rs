//! Vault records and their owner identifiers.

use std::{fmt, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

/// 4-byte identifier of the cryptographic identity a secret belongs to.
///
/// Rendered as the hex of its little-endian bytes, uppercase, so the value
/// `0x6943_050F` displays as `0F056943`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(u32);

impl OwnerId {
    /// Wrap a raw identifier.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Build from bytes in display order (little-endian).
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    /// Bytes in display order (little-endian).
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Raw identifier value.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.to_bytes()))
    }
}

/// Error parsing an [`OwnerId`] from its hex form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("owner id must be 8 hex digits, got {input:?}")]
pub struct ParseOwnerIdError {
    /// Rejected input
    pub input: String,
}

impl FromStr for OwnerId {
    type Err = ParseOwnerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 4];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| ParseOwnerIdError { input: s.to_string() })?;

        Ok(Self::from_bytes(bytes))
    }
}

/// UTF-8 secret that is wiped from memory when dropped.
///
/// `Debug` never prints the contents.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
    /// Take ownership of a secret.
    pub fn new(value: String) -> Self {
        Self(Zeroizing::new(value))
    }

    /// Borrow the secret text.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl Deref for SecretString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(<redacted>)")
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

/// One saved passphrase.
///
/// Insertion order in the vault is the only ordering; there is no timestamp
/// or record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Identity the secret was used with.
    pub owner_id: OwnerId,
    /// The passphrase itself.
    pub secret: SecretString,
}

impl Record {
    /// Create a record.
    pub fn new(owner_id: OwnerId, secret: impl Into<SecretString>) -> Self {
        Self { owner_id, secret: secret.into() }
    }
}
