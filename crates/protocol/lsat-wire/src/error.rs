//! Error types for wire encoding and decoding.

use lsat_types::ErrorCode;
use thiserror::Error;

/// Errors while decoding identifiers, macaroons and token strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended before a complete structure was read.
    #[error("truncated input: expected at least {expected} bytes, got {got}")]
    Truncated {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        got: usize,
    },

    /// Bytes left over after a complete structure.
    #[error("{0} trailing bytes after end of data")]
    TrailingBytes(usize),

    /// Identifier version is not one this implementation reads.
    #[error("unsupported identifier version: {0}")]
    UnsupportedIdentifierVersion(u16),

    /// Macaroon envelope version is not V2.
    #[error("unsupported macaroon format version: {0:#04x}")]
    UnsupportedMacaroonVersion(u8),

    /// A field appeared where a different one was required.
    #[error("unexpected field type {got} (expected {expected})")]
    UnexpectedField {
        /// Field type required at this position.
        expected: u64,
        /// Field type found.
        got: u64,
    },

    /// A varint did not terminate within 64 bits.
    #[error("varint overflow")]
    VarintOverflow,

    /// A field's content is invalid.
    #[error("invalid field: {0}")]
    InvalidField(String),

    /// Token string is not base64.
    #[error("invalid base64: {0}")]
    Base64(String),

    /// Token exceeds the size limit.
    #[error("token too large: {size} bytes (max {max})")]
    TooLarge {
        /// Actual size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Token carries more caveats than allowed.
    #[error("too many caveats (max {0})")]
    TooManyCaveats(usize),
}

impl DecodeError {
    /// Error code for this failure.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            DecodeError::UnsupportedIdentifierVersion(_) => ErrorCode::UnsupportedVersion,
            _ => ErrorCode::TokenMalformed,
        }
    }
}

/// Errors while encoding a macaroon.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Encoded token would exceed the size limit.
    #[error("token too large: {size} bytes (max {max})")]
    TooLarge {
        /// Actual size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Macaroon carries more caveats than allowed.
    #[error("too many caveats: {count} (max {max})")]
    TooManyCaveats {
        /// Actual count.
        count: usize,
        /// Maximum allowed count.
        max: usize,
    },
}

/// Errors while parsing LSAT HTTP headers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Header is empty.
    #[error("LSAT does not have the right format: empty header")]
    Empty,

    /// Scheme is not `LSAT`.
    #[error("LSAT does not have the right format: unexpected scheme {0:?}")]
    WrongScheme(String),

    /// Credential has no `:` between token and preimage.
    #[error("LSAT does not have the right format: missing ':' delimiter")]
    MissingDelimiter,

    /// Preimage is not 64 hex characters.
    #[error("LSAT does not have the right format: invalid preimage: {0}")]
    InvalidPreimage(String),

    /// Token part does not decode.
    #[error("LSAT does not have the right format: {0}")]
    Token(#[from] DecodeError),

    /// Challenge is missing a parameter.
    #[error("LSAT challenge is missing the {0} parameter")]
    MissingParameter(&'static str),
}

impl HeaderError {
    /// Error code for this failure.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            HeaderError::MissingParameter(_) => ErrorCode::ChallengeFormat,
            _ => ErrorCode::HeaderFormat,
        }
    }
}
