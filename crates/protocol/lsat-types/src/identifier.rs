//! The identifier embedded in every LSAT macaroon.

use lsat_crypto::{generate_token_id, CryptoError, Hash, TokenId};
use serde::{Deserialize, Serialize};

use crate::constants::IDENTIFIER_VERSION;

/// Payload carried as the macaroon identifier.
///
/// Binds a token to exactly one invoice through `payment_hash`; `token_id`
/// makes every minted token unique even for the same invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIdentifier {
    /// Identifier format version.
    pub version: u16,
    /// Payment hash of the invoice this token is bound to.
    pub payment_hash: Hash,
    /// Random token id.
    pub token_id: TokenId,
}

impl TokenIdentifier {
    /// Create a version-0 identifier with a fresh random token id.
    ///
    /// Fails only if the OS random source fails.
    pub fn new(payment_hash: Hash) -> Result<Self, CryptoError> {
        Ok(Self::with_token_id(payment_hash, generate_token_id()?))
    }

    /// Create a version-0 identifier with a given token id.
    pub fn with_token_id(payment_hash: Hash, token_id: TokenId) -> Self {
        Self {
            version: IDENTIFIER_VERSION,
            payment_hash,
            token_id,
        }
    }
}
