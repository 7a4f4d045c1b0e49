//! Fuzz target for menu hint computation
//!
//! # Strategy
//!
//! - Arbitrary Unicode secrets, deduplicated the way the menu does it
//!
//! # Invariants
//!
//! - One fragment per secret, same character count
//! - Masked fragments are pairwise distinct
//! - Full reveal returns the secrets unchanged
//! - NEVER panics on any input

#![no_main]

use std::collections::HashSet;

use cardvault_core::hints::{Reveal, compute_hints, dedup};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|secrets: Vec<String>| {
    let unique = dedup(secrets.iter().map(String::as_str));
    let hints = compute_hints(&unique);

    assert_eq!(hints.fragments().len(), unique.len());
    for (fragment, secret) in hints.fragments().iter().zip(&unique) {
        assert_eq!(fragment.chars().count(), secret.chars().count());
    }

    match hints.reveal() {
        Reveal::Full => assert_eq!(hints.fragments(), unique.as_slice()),
        Reveal::Prefix(_) | Reveal::Suffix(_) => {
            let distinct: HashSet<&String> = hints.fragments().iter().collect();
            assert_eq!(distinct.len(), unique.len());
        }
    }
});
