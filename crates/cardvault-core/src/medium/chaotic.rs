//! Chaotic medium wrapper for fault injection testing
//!
//! Medium wrapper that simulates the card being pulled at random points of an
//! operation. Used to check that appends survive medium-missing retries
//! without losing or duplicating records.

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use super::{Medium, MediumError, MediumSlot};

/// Chaotic medium wrapper that randomly reports the card as missing
///
/// Delegates to an underlying medium but fails `acquire` and slot operations
/// with [`MediumError::Missing`] based on a configured failure rate. Failures
/// are injected *before* delegating, so an injected failure never leaves a
/// half-applied write behind. Uses Arc<Mutex<>> for the RNG state, making it
/// Clone and shareable with the slots it hands out.
#[derive(Debug, Clone)]
pub struct ChaoticMedium<M: Medium> {
    inner: M,
    chaos: Chaos,
}

#[derive(Debug, Clone)]
struct Chaos {
    /// Failure rate (0.0 = never fail, 1.0 = always fail)
    failure_rate: f64,
    /// RNG state for deterministic chaos
    rng: Arc<Mutex<ChaoticRng>>,
    /// Writes that must fail before any succeeds
    forced_write_failures: Arc<Mutex<usize>>,
    /// Number of injected failures so far
    injected: Arc<Mutex<usize>>,
}

/// Simple deterministic RNG for chaos injection
///
/// Uses linear congruential generator (LCG) for fast, deterministic randomness.
/// This ensures chaos tests are reproducible with the same seed.
#[derive(Debug)]
struct ChaoticRng {
    state: u64,
}

impl ChaoticRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate next random value [0.0, 1.0)
    fn next(&mut self) -> f64 {
        // LCG constants from Numerical Recipes
        const A: u64 = 1_664_525;
        const C: u64 = 1_013_904_223;
        const M: u64 = 1u64 << 32;

        self.state = (A.wrapping_mul(self.state).wrapping_add(C)) % M;
        (self.state as f64) / (M as f64)
    }
}

impl Chaos {
    #[allow(clippy::expect_used)]
    fn roll(&self) -> Result<(), MediumError> {
        let fail = self.rng.lock().expect("ChaoticRng mutex poisoned").next() < self.failure_rate;
        if fail {
            *self.injected.lock().expect("injected mutex poisoned") += 1;
            return Err(MediumError::Missing);
        }
        Ok(())
    }

    #[allow(clippy::expect_used)]
    fn roll_write(&self) -> Result<(), MediumError> {
        {
            let mut forced = self.forced_write_failures.lock().expect("forced mutex poisoned");
            if *forced > 0 {
                *forced -= 1;
                drop(forced);
                *self.injected.lock().expect("injected mutex poisoned") += 1;
                return Err(MediumError::Missing);
            }
        }
        self.roll()
    }
}

impl<M: Medium> ChaoticMedium<M> {
    /// Create a chaotic wrapper
    ///
    /// # Panics
    ///
    /// Panics if `failure_rate` is not in [0.0, 1.0)
    pub fn new(inner: M, failure_rate: f64) -> Self {
        Self::with_seed(inner, failure_rate, 0x1234_5678_9ABC_DEF0)
    }

    /// Create with explicit seed for reproducible chaos
    ///
    /// A rate of 1.0 is rejected: every retry would fail forever.
    pub fn with_seed(inner: M, failure_rate: f64, seed: u64) -> Self {
        assert!(
            (0.0..1.0).contains(&failure_rate),
            "failure_rate must be in [0.0, 1.0), got {failure_rate}"
        );

        Self {
            inner,
            chaos: Chaos {
                failure_rate,
                rng: Arc::new(Mutex::new(ChaoticRng::new(seed))),
                forced_write_failures: Arc::new(Mutex::new(0)),
                injected: Arc::new(Mutex::new(0)),
            },
        }
    }

    /// Make the next `count` writes report the card as missing.
    #[allow(clippy::expect_used)]
    pub fn fail_next_writes(&self, count: usize) {
        *self.chaos.forced_write_failures.lock().expect("forced mutex poisoned") = count;
    }

    /// Underlying medium (for checking invariants after chaos).
    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Total number of injected failures.
    #[allow(clippy::expect_used)]
    pub fn injected_failures(&self) -> usize {
        *self.chaos.injected.lock().expect("injected mutex poisoned")
    }
}

impl<M: Medium> Medium for ChaoticMedium<M> {
    type Slot = ChaoticSlot<M::Slot>;

    fn acquire(&self) -> Result<Self::Slot, MediumError> {
        self.chaos.roll()?;
        Ok(ChaoticSlot { inner: self.inner.acquire()?, chaos: self.chaos.clone() })
    }
}

/// Slot handed out by [`ChaoticMedium`].
#[derive(Debug)]
pub struct ChaoticSlot<S> {
    inner: S,
    chaos: Chaos,
}

impl<S: MediumSlot> MediumSlot for ChaoticSlot<S> {
    fn root_path(&self) -> &Path {
        self.inner.root_path()
    }

    fn identity_hash(&self) -> Result<Vec<u8>, MediumError> {
        self.chaos.roll()?;
        self.inner.identity_hash()
    }

    fn exists(&self, path: &Path) -> Result<bool, MediumError> {
        self.chaos.roll()?;
        self.inner.exists(path)
    }

    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, MediumError> {
        self.chaos.roll()?;
        self.inner.read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), MediumError> {
        self.chaos.roll_write()?;
        self.inner.write(path, contents)
    }
}
