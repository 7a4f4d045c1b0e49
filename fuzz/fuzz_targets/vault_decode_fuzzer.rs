//! Fuzz target for vault blob decoding
//!
//! # Strategy
//!
//! - Random bytes: arbitrary blobs under a fixed key (short, corrupt, garbage)
//! - Sealed CBOR: attacker-chosen plaintext sealed under the real key, so the
//!   decoder sees hostile CBOR rather than keystream noise
//! - Bit flips: valid vaults with one flipped bit
//!
//! # Invariants
//!
//! - Decoding NEVER panics
//! - The coalescing decoder returns exactly what the typed one returns, or
//!   an empty list when the typed one fails

#![no_main]

use arbitrary::Arbitrary;
use cardvault_core::{
    OwnerId, Record, SeededEnv,
    codec::{decrypt_or_empty, decrypt_records, encrypt_records},
};
use cardvault_crypto::{NONCE_SIZE, VaultKey, seal_blob};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum DecodeAttack {
    RandomBytes { bytes: Vec<u8> },
    SealedCbor { plaintext: Vec<u8>, nonce: [u8; NONCE_SIZE] },
    BitFlip { secrets: Vec<(u32, String)>, position: u16, bit: u8 },
}

fuzz_target!(|attack: DecodeAttack| {
    let key = VaultKey::new([0x42; 32]);

    match attack {
        DecodeAttack::RandomBytes { bytes } => check_coalescing(&key, &bytes),

        DecodeAttack::SealedCbor { plaintext, nonce } => {
            if let Ok(blob) = seal_blob(&plaintext, &key, nonce) {
                check_coalescing(&key, &blob);
            }
        }

        DecodeAttack::BitFlip { secrets, position, bit } => {
            let records: Vec<Record> = secrets
                .into_iter()
                .map(|(owner, secret)| Record::new(OwnerId::new(owner), secret))
                .collect();
            let Ok(mut blob) = encrypt_records(&key, &records, &SeededEnv::new(1)) else {
                return;
            };

            let index = position as usize % blob.len();
            blob[index] ^= 1 << (bit % 8);

            check_coalescing(&key, &blob);
        }
    }
});

fn check_coalescing(key: &VaultKey, blob: &[u8]) {
    let typed = decrypt_records(key, blob);
    let coalesced = decrypt_or_empty(key, blob);

    match typed {
        Ok(records) => assert_eq!(records, coalesced),
        Err(_) => assert!(coalesced.is_empty()),
    }
}
