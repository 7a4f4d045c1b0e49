//! Fuzz target for vault appends under medium removal
//!
//! Wraps an in-memory card in `ChaoticMedium` and runs arbitrary sequences
//! of appends, reads, ejects and card swaps.
//!
//! # Strategy
//!
//! - Variable failure rates (0% to 90%)
//! - Ejects and reinsertion between operations
//! - Card swaps mid-session (key must be re-derived)
//!
//! # Invariants
//!
//! - Session operations NEVER panic
//! - A successful append grows the vault on the current card by exactly one
//! - A failed append leaves the current card's vault unchanged

#![no_main]

use arbitrary::Arbitrary;
use cardvault_core::{
    DeviceSecret, OwnerId, Record, SeededEnv, VaultSession,
    medium::{ChaoticMedium, MemoryMedium},
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct ChaosScenario {
    /// Seed for ChaoticMedium RNG (deterministic failures)
    chaos_seed: u64,
    /// Failure rate 0-9 maps to 0%-90%
    failure_rate_tenth: u8,
    operations: Vec<Operation>,
}

#[derive(Debug, Clone, Arbitrary)]
enum Operation {
    Append { owner: u32, secret: String },
    Load,
    Eject,
    Insert,
    SwapCard { identity: u8 },
}

fuzz_target!(|scenario: ChaosScenario| {
    let card = MemoryMedium::new(vec![0]);
    let rate = f64::from(scenario.failure_rate_tenth % 10) / 10.0;
    let medium = ChaoticMedium::with_seed(card.clone(), rate, scenario.chaos_seed);
    let device = DeviceSecret::from_material(b"fuzz-device");
    let mut session = VaultSession::new(&medium, &device, SeededEnv::new(scenario.chaos_seed));

    for op in scenario.operations.into_iter().take(64) {
        match op {
            Operation::Append { owner, secret } => {
                let before = committed(&card, &device);
                let record = Record::new(OwnerId::new(owner), secret);

                match session.try_append(&record) {
                    Ok(count) => {
                        let after = committed(&card, &device);
                        assert_eq!(count, after.len());
                        assert_eq!(after.len(), before.len() + 1);
                        assert_eq!(after.last(), Some(&record));
                    }
                    Err(_) => assert_eq!(committed(&card, &device), before),
                }
            }
            Operation::Load => {
                let _ = session.load_or_empty();
            }
            Operation::Eject => card.eject(),
            Operation::Insert => card.insert(),
            Operation::SwapCard { identity } => card.swap_card(vec![identity]),
        }
    }
});

/// Records on the card as a fresh session without chaos sees them.
fn committed(card: &MemoryMedium, device: &DeviceSecret) -> Vec<Record> {
    let was_inserted = card.is_inserted();
    card.insert();
    let records = VaultSession::new(card, device, SeededEnv::new(0)).load_or_empty();
    if !was_inserted {
        card.eject();
    }
    records
}
