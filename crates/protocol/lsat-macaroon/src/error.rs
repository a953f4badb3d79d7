//! Error types for token minting and verification.

use lsat_crypto::CryptoError;
use lsat_types::{CaveatError, ErrorCode};
use lsat_wire::{DecodeError, EncodeError};
use thiserror::Error;

/// Result type for token operations.
pub type TokenResult<T> = std::result::Result<T, TokenError>;

/// Errors from minting, verifying or inspecting a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TokenError {
    /// The token or its identifier is malformed.
    #[error("LSAT does not have the right format: {0}")]
    Parse(#[from] DecodeError),

    /// The signature does not verify under any configured root key.
    #[error("invalid macaroon signature")]
    SignatureInvalid,

    /// A required caveat is missing or has a different value.
    #[error("Caveats don't match")]
    CaveatMismatch,

    /// The preimage does not hash to the token's payment hash.
    #[error("Invalid Preimage {preimage} for PaymentHash {payment_hash}")]
    InvalidPreimage {
        /// Presented preimage, hex.
        preimage: String,
        /// Payment hash from the identifier, hex.
        payment_hash: String,
    },

    /// The token carries a third-party caveat, which is never discharged.
    #[error("undischarged third-party caveat at position {0}")]
    UndischargedCaveat(usize),

    /// A caveat would not decode back to itself.
    #[error("caveat {0:?} cannot be encoded unambiguously")]
    AmbiguousCaveat(String),

    /// No root key is available.
    #[error("no root key configured")]
    NoRootKey,

    /// The random source failed while minting.
    #[error("entropy source failed: {0}")]
    Entropy(String),

    /// The token could not be encoded.
    #[error("token encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// A cryptographic primitive failed.
    #[error("crypto error: {0}")]
    Crypto(CryptoError),
}

impl TokenError {
    /// Error code for this failure.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            TokenError::Parse(e) => e.error_code(),
            TokenError::SignatureInvalid => ErrorCode::SignatureInvalid,
            TokenError::CaveatMismatch => ErrorCode::CaveatMismatch,
            TokenError::InvalidPreimage { .. } => ErrorCode::InvalidPreimage,
            TokenError::UndischargedCaveat(_) => ErrorCode::UndischargedCaveat,
            TokenError::AmbiguousCaveat(_) => ErrorCode::MalformedCaveat,
            TokenError::NoRootKey => ErrorCode::NoRootKey,
            TokenError::Entropy(_) | TokenError::Encode(_) | TokenError::Crypto(_) => {
                ErrorCode::InternalError
            }
        }
    }
}

impl From<CryptoError> for TokenError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::Entropy(msg) => TokenError::Entropy(msg),
            other => TokenError::Crypto(other),
        }
    }
}

impl From<CaveatError> for TokenError {
    fn from(e: CaveatError) -> Self {
        match e {
            CaveatError::Mismatch => TokenError::CaveatMismatch,
            CaveatError::Format(raw) => TokenError::AmbiguousCaveat(raw),
        }
    }
}
