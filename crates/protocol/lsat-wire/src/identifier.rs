//! Binary encoding of the token identifier.
//!
//! ```text
//! [version: u16 BE]        # Identifier version (0)
//! [payment_hash: 32 bytes] # Lightning payment hash
//! [token_id: 32 bytes]     # Random token id
//! ```

use lsat_crypto::{Hash, TokenId};
use lsat_types::constants::{IDENTIFIER_LEN, IDENTIFIER_VERSION};
use lsat_types::TokenIdentifier;

use crate::error::DecodeError;

/// Encode an identifier to its fixed 66-byte form.
pub fn encode_identifier(id: &TokenIdentifier) -> Vec<u8> {
    let mut buf = Vec::with_capacity(IDENTIFIER_LEN);
    buf.extend_from_slice(&id.version.to_be_bytes());
    buf.extend_from_slice(id.payment_hash.as_bytes());
    buf.extend_from_slice(id.token_id.as_bytes());
    buf
}

/// Decode an identifier.
///
/// Rejects truncated input, unknown versions and trailing bytes.
pub fn decode_identifier(bytes: &[u8]) -> Result<TokenIdentifier, DecodeError> {
    if bytes.len() < 2 {
        return Err(DecodeError::Truncated {
            expected: IDENTIFIER_LEN,
            got: bytes.len(),
        });
    }

    let version = u16::from_be_bytes([bytes[0], bytes[1]]);
    if version != IDENTIFIER_VERSION {
        return Err(DecodeError::UnsupportedIdentifierVersion(version));
    }

    if bytes.len() < IDENTIFIER_LEN {
        return Err(DecodeError::Truncated {
            expected: IDENTIFIER_LEN,
            got: bytes.len(),
        });
    }
    if bytes.len() > IDENTIFIER_LEN {
        return Err(DecodeError::TrailingBytes(bytes.len() - IDENTIFIER_LEN));
    }

    let mut payment_hash = [0u8; 32];
    payment_hash.copy_from_slice(&bytes[2..34]);
    let mut token_id = [0u8; 32];
    token_id.copy_from_slice(&bytes[34..66]);

    Ok(TokenIdentifier {
        version,
        payment_hash: Hash::from_bytes(payment_hash),
        token_id: TokenId::from_bytes(token_id),
    })
}
