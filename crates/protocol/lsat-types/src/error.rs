//! Error codes and caveat errors for LSAT.
//!
//! [`ErrorCode`] is the stable numeric taxonomy shared by every crate in the
//! workspace. Adapters map codes to transport statuses; nothing here picks an
//! HTTP status.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// LSAT error codes.
///
/// Grouped by range: header errors (0x0001-0x00FF), token errors
/// (0x0100-0x01FF), invoice errors (0x0200-0x02FF) and configuration errors
/// (0x0300-0x03FF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
#[non_exhaustive]
pub enum ErrorCode {
    // =========================================================================
    // Header Errors (0x0001 - 0x00FF)
    // =========================================================================
    /// Authorization header is not a well-formed LSAT credential
    HeaderFormat = 0x0001,
    /// No credential presented; payment is required
    PaymentRequired = 0x0002,
    /// WWW-Authenticate challenge is not well-formed
    ChallengeFormat = 0x0003,

    // =========================================================================
    // Token Errors (0x0100 - 0x01FF)
    // =========================================================================
    /// Token bytes could not be parsed
    TokenMalformed = 0x0100,
    /// Macaroon signature does not verify under any root key
    SignatureInvalid = 0x0101,
    /// Presented caveats do not satisfy the required caveats
    CaveatMismatch = 0x0102,
    /// Preimage does not hash to the token's payment hash
    InvalidPreimage = 0x0103,
    /// Token carries a third-party caveat that cannot be discharged
    UndischargedCaveat = 0x0104,
    /// Identifier version is not supported
    UnsupportedVersion = 0x0105,
    /// Caveat cannot be encoded unambiguously
    MalformedCaveat = 0x0106,
    /// No root key is configured
    NoRootKey = 0x0107,

    // =========================================================================
    // Invoice Errors (0x0200 - 0x02FF)
    // =========================================================================
    /// The invoice backend failed to issue an invoice
    InvoiceFailed = 0x0200,
    /// Requested amount is outside what the backend accepts
    InvalidAmount = 0x0201,
    /// The backend returned an invoice that could not be decoded
    InvalidInvoice = 0x0202,
    /// The invoice backend did not answer in time
    Timeout = 0x0203,

    // =========================================================================
    // Configuration Errors (0x0300 - 0x03FF)
    // =========================================================================
    /// Configuration is missing or invalid
    InvalidConfig = 0x0300,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (entropy, encoding)
    InternalError = 0xFFFF,
}

impl ErrorCode {
    /// Get a user-friendly suggestion for recovering from this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::HeaderFormat => Some("Send 'Authorization: LSAT <macaroon>:<preimage>'."),
            Self::PaymentRequired => Some("Pay the invoice from the challenge and retry with the preimage."),
            Self::ChallengeFormat => Some("Expected 'LSAT macaroon=<token>, invoice=<payment request>'."),

            Self::TokenMalformed => Some("The token is not a valid base64 macaroon. Request a new challenge."),
            Self::SignatureInvalid => Some("The token was not minted with a known root key. Request a new challenge."),
            Self::CaveatMismatch => Some("The token is not valid for this request. Request a new challenge for this resource."),
            Self::InvalidPreimage => Some("Use the preimage returned when paying this token's invoice."),
            Self::UndischargedCaveat => Some("Third-party caveats are not supported. Mint a token without them."),
            Self::UnsupportedVersion => Some("The token identifier version is unknown. Request a new challenge."),
            Self::MalformedCaveat => Some("Caveat conditions and values must not contain '='."),
            Self::NoRootKey => Some("Configure a root key with 'lsat init' or LSAT_ROOT_KEY."),

            Self::InvoiceFailed => Some("Check that the Lightning backend is reachable and funded."),
            Self::InvalidAmount => Some("Adjust the price to fit the backend's sendable range."),
            Self::InvalidInvoice => Some("The backend returned an unusable invoice. Check its configuration."),
            Self::Timeout => Some("The Lightning backend timed out. Try again."),

            Self::InvalidConfig => Some("Check the configuration file. Run 'lsat init' to create one."),

            Self::InternalError => Some("An internal error occurred. Please report this issue."),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCode::HeaderFormat => "HEADER_FORMAT",
            ErrorCode::PaymentRequired => "PAYMENT_REQUIRED",
            ErrorCode::ChallengeFormat => "CHALLENGE_FORMAT",
            ErrorCode::TokenMalformed => "TOKEN_MALFORMED",
            ErrorCode::SignatureInvalid => "SIGNATURE_INVALID",
            ErrorCode::CaveatMismatch => "CAVEAT_MISMATCH",
            ErrorCode::InvalidPreimage => "INVALID_PREIMAGE",
            ErrorCode::UndischargedCaveat => "UNDISCHARGED_CAVEAT",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::MalformedCaveat => "MALFORMED_CAVEAT",
            ErrorCode::NoRootKey => "NO_ROOT_KEY",
            ErrorCode::InvoiceFailed => "INVOICE_FAILED",
            ErrorCode::InvalidAmount => "INVALID_AMOUNT",
            ErrorCode::InvalidInvoice => "INVALID_INVOICE",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        f.write_str(name)
    }
}

/// Caveat codec and caveat check failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaveatError {
    /// The string does not split on `=` into exactly two parts.
    #[error("LSAT does not have the right format: caveat {0:?}")]
    Format(String),

    /// A required caveat is missing or has a different value.
    #[error("Caveats don't match")]
    Mismatch,
}

impl CaveatError {
    /// Error code for this failure.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CaveatError::Format(_) => ErrorCode::MalformedCaveat,
            CaveatError::Mismatch => ErrorCode::CaveatMismatch,
        }
    }
}
