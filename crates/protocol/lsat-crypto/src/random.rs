//! Secure randomness for token identifiers and root keys.
//!
//! All randomness comes from the operating system CSPRNG. A failing entropy
//! source is reported as [`CryptoError::Entropy`] and never replaced with a
//! default value.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CryptoError;
use crate::{RootKey, TokenId};

/// Fill a fresh buffer of `len` bytes from the OS random source.
pub fn random_bytes(len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut buf = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| CryptoError::Entropy(e.to_string()))?;
    Ok(buf)
}

/// Generate a fresh 32-byte token id.
///
/// # Example
/// ```
/// use lsat_crypto::generate_token_id;
///
/// let a = generate_token_id().unwrap();
/// let b = generate_token_id().unwrap();
/// assert_ne!(a, b);
/// ```
pub fn generate_token_id() -> Result<TokenId, CryptoError> {
    let mut id = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut id)
        .map_err(|e| CryptoError::Entropy(e.to_string()))?;
    Ok(TokenId(id))
}

/// Generate a fresh 32-byte root key.
pub fn generate_root_key() -> Result<RootKey, CryptoError> {
    RootKey::from_bytes(random_bytes(32)?)
}
