//! Whole-list vault codec.
//!
//! The record list is CBOR-encoded as one array of `{owner_id, secret}` maps
//! and sealed as a single blob. Each call builds its own cipher state; encrypt
//! and decrypt share nothing.
//!
//! There is no integrity tag, so a wrong key or flipped bits surface as a CBOR
//! decode failure (or, rarely, as wrong records). Decoding also rejects
//! trailing bytes after the array, which catches most garbage plaintexts that
//! happen to start with a valid item.

use cardvault_crypto::{VaultKey, open_blob, seal_blob};
use zeroize::Zeroizing;

use crate::{DecryptFailure, Environment, Record, VaultError};

/// Encode and encrypt the full record list.
pub fn encrypt_records<E: Environment>(
    key: &VaultKey,
    records: &[Record],
    env: &E,
) -> Result<Vec<u8>, VaultError> {
    let mut plaintext = Zeroizing::new(Vec::new());
    ciborium::into_writer(records, &mut *plaintext)
        .map_err(|err| VaultError::Internal(format!("encode records: {err}")))?;

    seal_blob(&plaintext, key, env.nonce())
        .map_err(|err| VaultError::Internal(format!("seal vault: {err}")))
}

/// Decrypt and decode a blob, keeping the failure kind.
pub fn decrypt_records(key: &VaultKey, blob: &[u8]) -> Result<Vec<Record>, DecryptFailure> {
    let plaintext = Zeroizing::new(open_blob(blob, key)?);

    let mut remaining: &[u8] = &plaintext;
    let records: Vec<Record> = ciborium::from_reader(&mut remaining)
        .map_err(|err| DecryptFailure::Malformed(err.to_string()))?;

    if !remaining.is_empty() {
        return Err(DecryptFailure::Malformed(format!(
            "{} trailing bytes after record list",
            remaining.len()
        )));
    }

    Ok(records)
}

/// Decrypt and decode a blob, treating any failure as an empty vault.
///
/// An unreadable vault means "feature not in use" to the menu, not an error.
pub fn decrypt_or_empty(key: &VaultKey, blob: &[u8]) -> Vec<Record> {
    decrypt_records(key, blob).unwrap_or_else(|failure| {
        match &failure {
            DecryptFailure::Cipher(err) if err.is_internal() => {
                tracing::error!(%failure, bytes = blob.len(), "vault cipher failed, treating as empty");
            },
            _ => tracing::warn!(%failure, bytes = blob.len(), "vault unreadable, treating as empty"),
        }
        Vec::new()
    })
}
