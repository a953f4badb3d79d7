//! Error types for the access gate and invoice issuers.

use lsat_macaroon::TokenError;
use lsat_types::ErrorCode;
use lsat_wire::HeaderError;
use serde::Serialize;
use thiserror::Error;

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;

/// Errors that can occur while gating a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GateError {
    /// The Authorization header is not a well-formed LSAT credential.
    #[error(transparent)]
    HeaderFormat(#[from] HeaderError),

    /// Minting or verifying a token failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The backend refused or failed to issue an invoice.
    #[error("invoice issuance failed: {reason}")]
    InvoiceIssuance {
        /// Description of what went wrong
        reason: String,
    },

    /// The backend could not be reached.
    #[error("invoice backend communication error: {0}")]
    BackendNetwork(String),

    /// The backend did not answer in time.
    #[error("invoice backend timed out")]
    Timeout,

    /// The price is outside what can be invoiced.
    #[error("invalid amount {amount_sats} sats: {reason}")]
    InvalidAmount {
        /// Requested amount
        amount_sats: i64,
        /// Why it was rejected
        reason: String,
    },

    /// The backend returned an invoice that could not be used.
    #[error("invalid invoice: {0}")]
    InvalidInvoice(String),

    /// A Lightning address is malformed.
    #[error("invalid lightning address: {0:?}")]
    InvalidAddress(String),

    /// Gate configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Why access was not granted, independent of transport.
///
/// Adapters map kinds to status codes; the gate never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessErrorKind {
    /// Malformed Authorization header
    HeaderFormat,
    /// Token could not be parsed
    TokenParse,
    /// Token signature does not verify
    SignatureInvalid,
    /// Token caveats do not satisfy the request
    CaveatMismatch,
    /// Preimage does not match the payment hash
    InvalidPreimage,
    /// Token needs a third-party discharge
    UndischargedCaveat,
    /// No invoice could be issued
    InvoiceIssuance,
    /// Random source failed
    Entropy,
    /// Gate misconfigured
    Config,
    /// Anything else
    Internal,
}

impl GateError {
    /// Create an issuance error.
    pub fn issuance(reason: impl Into<String>) -> Self {
        Self::InvoiceIssuance {
            reason: reason.into(),
        }
    }

    /// Classify the error.
    pub fn kind(&self) -> AccessErrorKind {
        match self {
            Self::HeaderFormat(_) => AccessErrorKind::HeaderFormat,
            Self::Token(e) => match e {
                TokenError::Parse(_) => AccessErrorKind::TokenParse,
                TokenError::SignatureInvalid => AccessErrorKind::SignatureInvalid,
                TokenError::CaveatMismatch => AccessErrorKind::CaveatMismatch,
                TokenError::InvalidPreimage { .. } => AccessErrorKind::InvalidPreimage,
                TokenError::UndischargedCaveat(_) => AccessErrorKind::UndischargedCaveat,
                TokenError::Entropy(_) => AccessErrorKind::Entropy,
                TokenError::AmbiguousCaveat(_) | TokenError::NoRootKey => AccessErrorKind::Config,
                _ => AccessErrorKind::Internal,
            },
            Self::InvoiceIssuance { .. }
            | Self::BackendNetwork(_)
            | Self::Timeout
            | Self::InvalidAmount { .. }
            | Self::InvalidInvoice(_)
            | Self::InvalidAddress(_) => AccessErrorKind::InvoiceIssuance,
            Self::Config(_) => AccessErrorKind::Config,
        }
    }

    /// Protocol error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::HeaderFormat(e) => e.error_code(),
            Self::Token(e) => e.error_code(),
            Self::InvoiceIssuance { .. } | Self::BackendNetwork(_) => ErrorCode::InvoiceFailed,
            Self::Timeout => ErrorCode::Timeout,
            Self::InvalidAmount { .. } => ErrorCode::InvalidAmount,
            Self::InvalidInvoice(_) => ErrorCode::InvalidInvoice,
            Self::InvalidAddress(_) | Self::Config(_) => ErrorCode::InvalidConfig,
        }
    }

    /// Returns a user-friendly suggestion for recovering from this error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::BackendNetwork(_) => "Check network connectivity to the Lightning backend",
            Self::InvalidAddress(_) => "Use a Lightning address of the form user@domain",
            _ => self
                .error_code()
                .suggestion()
                .unwrap_or("This is an internal error; please report it"),
        }
    }

    /// Returns true if this error is transient and the operation may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::BackendNetwork(_) | Self::Timeout)
    }
}

impl From<reqwest::Error> for GateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::BackendNetwork(e.to_string())
        }
    }
}
