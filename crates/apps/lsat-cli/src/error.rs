//! CLI error types.

use std::path::PathBuf;

use lsat_crypto::CryptoError;
use lsat_gate::{AccessErrorKind, GateError};
use lsat_macaroon::TokenError;
use lsat_types::ErrorCode;
use lsat_wire::HeaderError;
use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error enum wrapping all crate errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token minting or verification error.
    #[error("{0}")]
    Token(#[from] TokenError),

    /// Access gate or invoice backend error.
    #[error("{0}")]
    Gate(#[from] GateError),

    /// Malformed header.
    #[error("{0}")]
    Header(#[from] HeaderError),

    /// Key generation or key parsing error.
    #[error("{0}")]
    Crypto(#[from] CryptoError),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// User-facing error with actionable message.
    #[error("{0}")]
    User(String),

    /// Configuration file already exists.
    #[error("Configuration already exists at {}. Use --force to overwrite.", .0.display())]
    ConfigExists(PathBuf),

    /// Invalid hex argument.
    #[error("Invalid {field}: {reason}")]
    InvalidHex {
        /// Which argument
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Invalid caveat argument.
    #[error("Invalid caveat {0:?}: expected condition=value")]
    InvalidCaveat(String),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a user-facing error.
    pub fn user(msg: impl Into<String>) -> Self {
        Self::User(msg.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors: 1
            Self::User(_) | Self::ConfigExists(_) | Self::Crypto(_) => 1,
            // Config errors: 3
            Self::Config(_) | Self::Toml(_) => 3,
            // Token verification errors: 4
            Self::Token(_) => 4,
            Self::Gate(e) => match e.kind() {
                AccessErrorKind::InvoiceIssuance => 5,
                AccessErrorKind::Config => 3,
                _ => 4,
            },
            // IO errors: 9
            Self::Io(_) => 9,
            // Format errors: 10
            Self::Json(_) | Self::Header(_) | Self::InvalidHex { .. } | Self::InvalidCaveat(_) => {
                10
            }
        }
    }

    /// Get the protocol error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            // Delegated errors
            Self::Token(e) => e.error_code(),
            Self::Gate(e) => e.error_code(),
            Self::Header(e) => e.error_code(),

            // Argument errors
            Self::InvalidHex { field, .. } if *field == "preimage" => ErrorCode::InvalidPreimage,
            Self::InvalidHex { .. } => ErrorCode::TokenMalformed,
            Self::InvalidCaveat(_) => ErrorCode::MalformedCaveat,

            // Config errors
            Self::Config(_) | Self::Toml(_) | Self::ConfigExists(_) => ErrorCode::InvalidConfig,

            Self::Crypto(_) | Self::Io(_) | Self::Json(_) | Self::User(_) => {
                ErrorCode::InternalError
            }
        }
    }
}
