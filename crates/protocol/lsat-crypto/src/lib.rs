//! Cryptographic primitives for LSAT tokens.
//!
//! This crate provides the cryptographic building blocks used to mint and
//! verify LSAT macaroons:
//!
//! - **Payment hashes**: SHA-256 of a Lightning payment preimage
//! - **Macaroon MAC chain**: HMAC-SHA256 key derivation and signature chaining
//! - **Constant-time comparison** of signatures
//! - **Randomness**: token identifiers and root keys from the OS CSPRNG
//!
//! # Example
//!
//! ```
//! use lsat_crypto::{payment_hash, verify_preimage, Preimage};
//!
//! let preimage = Preimage::from_bytes([7u8; 32]);
//! let hash = payment_hash(&preimage);
//! assert!(verify_preimage(&preimage, &hash));
//! ```

mod error;
mod hash;
mod mac;
mod random;
mod serde_impl;

pub use error::CryptoError;
pub use hash::{payment_hash, verify_preimage};
pub use mac::{bind_third_party, chain_caveat, constant_time_eq, derive_macaroon_key, hmac_sha256};
pub use random::{generate_root_key, generate_token_id, random_bytes};

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length in bytes of hashes, preimages, token ids and macaroon signatures.
pub const HASH_LEN: usize = 32;

/// A 32-byte SHA-256 hash (a Lightning payment hash).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// Create a Hash from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a Hash from a slice, which must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self(to_array(bytes)?))
    }

    /// Parse a Hash from 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        Self::from_slice(&decode_hex(s)?)
    }

    /// Get the raw bytes of the hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash({})", short_hex(&self.0))
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Hash {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A 32-byte Lightning payment preimage.
///
/// Revealed to the payer when an invoice settles; presenting it proves payment.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Preimage([u8; 32]);

impl Preimage {
    /// Create a Preimage from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a Preimage from exactly 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        Ok(Self(to_array(&decode_hex(s)?)?))
    }

    /// Get the raw bytes of the preimage.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for Preimage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Preimage([REDACTED])")
    }
}

impl std::fmt::Display for Preimage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Preimage {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// The shared secret used to mint and verify macaroons.
///
/// Arbitrary length, but never empty. Implements Zeroize + ZeroizeOnDrop
/// to clear key material from memory.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RootKey(Vec<u8>);

impl RootKey {
    /// Create a RootKey from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, CryptoError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(CryptoError::EmptyRootKey);
        }
        Ok(Self(bytes))
    }

    /// Parse a RootKey from hex.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(decode_hex(s)?)
    }

    /// Get the raw bytes of the root key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex encoding, for writing configuration files.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl std::fmt::Debug for RootKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RootKey([REDACTED])")
    }
}

/// A macaroon signature: the tail of the HMAC-SHA256 chain.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 32]);

impl Signature {
    /// Create a Signature from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a Signature from a slice, which must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self(to_array(bytes)?))
    }

    /// Get the raw bytes of the signature.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", short_hex(&self.0))
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Random 32-byte token identifier embedded in every LSAT.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub [u8; 32]);

impl TokenId {
    /// Create a TokenId from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the token id.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenId({})", short_hex(&self.0))
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(s.trim()).map_err(|e| CryptoError::InvalidHex(e.to_string()))
}

fn to_array(bytes: &[u8]) -> Result<[u8; 32], CryptoError> {
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidLength {
            expected: HASH_LEN,
            actual: bytes.len(),
        })
}

/// Helper function to convert bytes to a short hex string (for Debug output).
fn short_hex(bytes: &[u8]) -> String {
    hex::encode(&bytes[..8.min(bytes.len())]) + "..."
}
