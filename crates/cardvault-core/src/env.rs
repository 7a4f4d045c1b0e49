//! Environment abstraction for deterministic testing.
//!
//! The only system resource vault logic needs is randomness for the per-write
//! nonce. Production uses OS entropy; tests use a seeded generator so sealed
//! blobs are reproducible.

use std::sync::{Arc, Mutex};

use cardvault_crypto::NONCE_SIZE;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Source of random bytes.
///
/// # Invariants
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - Given the same seed, a deterministic implementation produces the same
///   sequence of bytes
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Fresh nonce for one blob write.
    fn nonce(&self) -> [u8; NONCE_SIZE] {
        let mut nonce = [0u8; NONCE_SIZE];
        self.random_bytes(&mut nonce);
        nonce
    }
}

/// Production environment backed by the OS RNG.
///
/// # Panics
///
/// Panics if the OS RNG fails. Sealing a vault without real randomness would
/// risk keystream reuse, so there is no fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - cannot seal vault safely");
    }
}

/// Deterministic environment for tests and simulation.
///
/// Clones share the same generator, so interleaved callers still see one
/// reproducible stream.
#[derive(Debug, Clone)]
pub struct SeededEnv {
    rng: Arc<Mutex<ChaCha20Rng>>,
}

impl SeededEnv {
    /// Create an environment seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self { rng: Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(seed))) }
    }
}

impl Environment for SeededEnv {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for test
    /// code.
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        self.rng.lock().expect("SeededEnv mutex poisoned").fill_bytes(buffer);
    }
}
