//! Cardvault Cryptographic Primitives
//!
//! Cryptographic building blocks for the cardvault passphrase store. Pure
//! functions with deterministic outputs. Callers provide random bytes for
//! deterministic testing.
//!
//! # Key Lifecycle
//!
//! The vault key binds the stored ciphertext to both the device and the
//! removable medium it lives on. A device-bound secret is combined with the
//! medium's identity hash through HKDF, and the resulting key drives a
//! counter-mode stream cipher over the whole serialized record list.
//!
//! ```text
//! Device Secret     Medium Identity Hash
//!        │                 │
//!        └──────┬──────────┘
//!               ▼
//! HKDF-SHA256 → Vault Key (per medium session)
//!               │
//!               ▼
//! XChaCha20 (fresh nonce per write) → Blob
//! ```
//!
//! # Security
//!
//! Confidentiality only:
//! - The blob carries no authentication tag. Tampering is not detected here;
//!   callers treat undecodable plaintext as an absent vault.
//! - Every write draws a fresh 24-byte nonce, so rewriting the file never
//!   reuses a keystream.
//!
//! Key Handling:
//! - [`VaultKey`] zeroizes its bytes on drop and never prints them.
//! - Derivation yields exactly 32 bytes or nothing.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod blob;
mod error;
mod key;

pub use blob::{NONCE_SIZE, open_blob, seal_blob};
pub use error::CipherError;
pub use key::{KEY_SIZE, VaultKey, derive_device_key, derive_medium_key};
