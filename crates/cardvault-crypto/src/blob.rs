//! Whole-blob encryption using the `XChaCha20` stream cipher
//!
//! All functions are pure - the nonce must be provided by the caller.
//!
//! The sealed layout is `nonce (24 bytes) || keystream XOR plaintext`. There
//! is no header, version tag or authentication tag.

use chacha20::{
    XChaCha20,
    cipher::{KeyIvInit, StreamCipher},
};

use crate::{CipherError, VaultKey};

/// Size of the per-write nonce prefix (24 bytes)
pub const NONCE_SIZE: usize = 24;

/// Encrypt a serialized record list.
///
/// Returns the nonce followed by the ciphertext. A fresh cipher state is
/// built for every call, starting the block counter at zero under the given
/// nonce.
///
/// # Security
///
/// - Caller MUST provide a nonce that is never reused under the same key. In
///   production this is 24 bytes of OS randomness per write.
/// - No integrity protection: flipped ciphertext bits flip plaintext bits.
pub fn seal_blob(
    plaintext: &[u8],
    key: &VaultKey,
    nonce: [u8; NONCE_SIZE],
) -> Result<Vec<u8>, CipherError> {
    let mut blob = Vec::with_capacity(NONCE_SIZE + plaintext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(plaintext);

    apply_keystream(key, &nonce, &mut blob[NONCE_SIZE..])?;

    debug_assert_eq!(blob.len(), NONCE_SIZE + plaintext.len());
    Ok(blob)
}

/// Decrypt a blob produced by [`seal_blob`].
///
/// # Errors
///
/// - `Truncated`: blob is shorter than the nonce prefix
///
/// A wrong key does not fail here; it yields garbage plaintext that the
/// caller's decoder rejects.
pub fn open_blob(blob: &[u8], key: &VaultKey) -> Result<Vec<u8>, CipherError> {
    if blob.len() < NONCE_SIZE {
        return Err(CipherError::Truncated { len: blob.len(), min: NONCE_SIZE });
    }

    let (nonce, ciphertext) = blob.split_at(NONCE_SIZE);
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    nonce_bytes.copy_from_slice(nonce);

    let mut plaintext = ciphertext.to_vec();
    apply_keystream(key, &nonce_bytes, &mut plaintext)?;

    Ok(plaintext)
}

fn apply_keystream(
    key: &VaultKey,
    nonce: &[u8; NONCE_SIZE],
    buffer: &mut [u8],
) -> Result<(), CipherError> {
    let mut cipher = XChaCha20::new(key.as_bytes().into(), nonce.into());
    cipher
        .try_apply_keystream(buffer)
        .map_err(|_| CipherError::KeystreamExhausted { len: buffer.len() })
}
