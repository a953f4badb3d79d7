//! Error types for lsat-crypto

use thiserror::Error;

/// Errors that can occur in cryptographic operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid hex encoding
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    /// Byte string of the wrong length
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Root key material is empty
    #[error("Root key must not be empty")]
    EmptyRootKey,

    /// HMAC key could not be initialised
    #[error("Invalid MAC key: {0}")]
    InvalidMacKey(String),

    /// The operating system random source failed
    #[error("Entropy source failure: {0}")]
    Entropy(String),
}
