//! Chaos property tests for the append path
//!
//! The medium is wrapped in `ChaoticMedium`, which reports the card as
//! missing at random points of each scoped operation. Appends are retried
//! until they land, the way the save flow does after the user reinserts the
//! card. Invariants checked afterwards:
//! - every record is stored exactly once, in append order
//! - no attempt leaves the vault unreadable

use cardvault_core::{
    DeviceSecret, OwnerId, Record, SeededEnv, VaultError, VaultSession,
    medium::{ChaoticMedium, MemoryMedium},
};
use proptest::prelude::*;

const MAX_ATTEMPTS: usize = 10_000;

fn append_until_stored(
    session: &mut VaultSession<'_, ChaoticMedium<MemoryMedium>, DeviceSecret, SeededEnv>,
    record: &Record,
) -> usize {
    for _ in 0..MAX_ATTEMPTS {
        match session.try_append(record) {
            Ok(count) => return count,
            Err(VaultError::MediumMissing) => {},
            Err(e) => panic!("unexpected append error: {e:?}"),
        }
    }
    panic!("append did not succeed within {MAX_ATTEMPTS} attempts");
}

#[test]
fn prop_append_invariant_across_missing_medium() {
    proptest!(|(
        failure_rate in 0.0..0.5,
        seed in any::<u64>(),
        secrets in prop::collection::vec("[a-z]{1,12}", 1..12),
    )| {
        let medium = ChaoticMedium::with_seed(MemoryMedium::new(b"card".to_vec()), failure_rate, seed);
        let device = DeviceSecret::from_material(b"device");
        let mut session = VaultSession::new(&medium, &device, SeededEnv::new(seed));

        let expected: Vec<Record> = secrets
            .iter()
            .enumerate()
            .map(|(i, secret)| Record::new(OwnerId::new(i as u32), secret.as_str()))
            .collect();

        for (i, record) in expected.iter().enumerate() {
            let count = append_until_stored(&mut session, record);
            prop_assert_eq!(count, i + 1);
        }

        // ORACLE: a fresh session on the bare card sees every record once
        let mut reader = VaultSession::new(medium.inner(), &device, SeededEnv::new(0));
        prop_assert_eq!(reader.load().unwrap(), expected);
        prop_assert_eq!(medium.inner().write_count(), secrets.len());
    });
}

#[test]
fn forced_write_failures_leave_vault_untouched() {
    let medium = ChaoticMedium::with_seed(MemoryMedium::new(b"card".to_vec()), 0.0, 7);
    let device = DeviceSecret::from_material(b"device");
    let mut session = VaultSession::new(&medium, &device, SeededEnv::new(7));
    let first = Record::new(OwnerId::new(1), "first");
    session.try_append(&first).unwrap();

    medium.fail_next_writes(3);
    let second = Record::new(OwnerId::new(1), "second");
    for _ in 0..3 {
        assert_eq!(session.try_append(&second), Err(VaultError::MediumMissing));
        let mut reader = VaultSession::new(medium.inner(), &device, SeededEnv::new(0));
        assert_eq!(reader.load().unwrap(), [first.clone()]);
    }

    assert_eq!(session.try_append(&second).unwrap(), 2);
    assert_eq!(medium.injected_failures(), 3);
}
