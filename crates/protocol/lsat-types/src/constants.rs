//! LSAT protocol constants.

// =============================================================================
// Identifier
// =============================================================================

/// Identifier version produced by this implementation.
pub const IDENTIFIER_VERSION: u16 = 0;

/// Length of the random token id in bytes.
pub const TOKEN_ID_LEN: usize = 32;

/// Encoded identifier length: version (2) + payment hash (32) + token id (32).
pub const IDENTIFIER_LEN: usize = 2 + 32 + TOKEN_ID_LEN;

// =============================================================================
// Macaroon
// =============================================================================

/// Location stamped on every minted macaroon.
pub const MACAROON_LOCATION: &str = "LSAT";

/// Maximum accepted size of a decoded token, in bytes.
pub const MAX_TOKEN_SIZE: usize = 16 * 1024;

/// Maximum number of caveats accepted in a single token.
pub const MAX_CAVEATS: usize = 64;

/// Condition name of the caveat binding a token to a request path.
pub const REQUEST_PATH_CAVEAT: &str = "RequestPath";

// =============================================================================
// HTTP
// =============================================================================

/// Authentication scheme name used in both challenge and credential headers.
pub const LSAT_SCHEME: &str = "LSAT";

/// Accept header marker that opts a client into the payment flow.
pub const ACCEPT_MARKER: &str = "application/vnd.lsat.v1.full+json";

/// Length of a hex-encoded preimage.
pub const PREIMAGE_HEX_LEN: usize = 64;

// =============================================================================
// Invoices
// =============================================================================

/// Default memo attached to issued invoices.
pub const DEFAULT_INVOICE_MEMO: &str = "LSAT";

/// Default price per request in satoshis.
pub const DEFAULT_PRICE_SATS: i64 = 1;

// =============================================================================
// Response messages
// =============================================================================

/// Message for content served without payment.
pub const FREE_CONTENT_MESSAGE: &str = "Free Content";

/// Message for content served after successful verification.
pub const PROTECTED_CONTENT_MESSAGE: &str = "Protected Content";

/// Message accompanying a payment challenge.
pub const PAYMENT_REQUIRED_MESSAGE: &str = "Payment Required";
