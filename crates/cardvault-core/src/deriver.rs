//! Vault key derivation from the master secret and medium identity.

use cardvault_crypto::{KEY_SIZE, VaultKey};

use crate::{KeyUnavailable, MasterSecret, SecretHandle};

/// Derive the vault key for a medium.
///
/// Opens the master secret in bypass mode, derives a key salted with the
/// medium identity, and releases the handle before returning. Any failure is
/// reported as [`KeyUnavailable`]; the lower-level error text is kept for
/// logging only.
pub fn derive_key<S: MasterSecret>(
    master: &S,
    medium_identity: &[u8],
) -> Result<VaultKey, KeyUnavailable> {
    let raw = {
        let handle = master
            .open_bypass()
            .map_err(|err| KeyUnavailable::MasterSecret(err.to_string()))?;
        handle
            .encryption_key(medium_identity)
            .map_err(|err| KeyUnavailable::MasterSecret(err.to_string()))?
    };

    // A conforming master secret never gets here
    if raw.len() != KEY_SIZE {
        tracing::error!(actual = raw.len(), "master secret returned wrong key length");
        return Err(KeyUnavailable::InvalidLength { actual: raw.len() });
    }

    VaultKey::from_slice(&raw).map_err(|_| KeyUnavailable::InvalidLength { actual: raw.len() })
}
