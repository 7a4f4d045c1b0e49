//! Error types for blob cipher and key operations

use thiserror::Error;

/// Errors from vault cipher operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Key material has the wrong length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length
        expected: usize,
        /// Actual key length
        actual: usize,
    },

    /// Blob is too short to hold the nonce prefix
    #[error("truncated blob: {len} bytes, need at least {min}")]
    Truncated {
        /// Blob length
        len: usize,
        /// Minimum blob length
        min: usize,
    },

    /// Keystream counter would wrap for this plaintext length
    #[error("keystream exhausted for {len} byte payload")]
    KeystreamExhausted {
        /// Payload length that overflowed the counter
        len: usize,
    },
}

impl CipherError {
    /// Returns true if this error indicates a programming bug rather than bad
    /// input data.
    ///
    /// A truncated blob comes from the medium and is expected noise. A key of
    /// the wrong length can only come from a broken key source.
    pub fn is_internal(&self) -> bool {
        match self {
            Self::InvalidKeyLength { .. } | Self::KeystreamExhausted { .. } => true,
            Self::Truncated { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_is_not_internal() {
        let err = CipherError::Truncated { len: 3, min: 24 };
        assert!(!err.is_internal());
    }

    #[test]
    fn invalid_key_length_is_internal() {
        let err = CipherError::InvalidKeyLength { expected: 32, actual: 16 };
        assert!(err.is_internal());
    }

    #[test]
    fn error_display() {
        let err = CipherError::Truncated { len: 3, min: 24 };
        assert_eq!(err.to_string(), "truncated blob: 3 bytes, need at least 24");
    }
}
