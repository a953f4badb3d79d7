//! Payment hash computation.
//!
//! Lightning payment hashes are a bare SHA-256 of the preimage:
//! ```text
//! PaymentHash(preimage) = SHA256(preimage)
//! ```
//! No domain separator is applied, the value must match what the invoice
//! issuer committed to.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::{Hash, Preimage};

/// Compute the payment hash of a preimage.
///
/// # Example
/// ```
/// use lsat_crypto::{payment_hash, Preimage};
///
/// let hash = payment_hash(&Preimage::from_bytes([0u8; 32]));
/// assert_eq!(
///     hash.to_hex(),
///     "66687aadf862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925"
/// );
/// ```
pub fn payment_hash(preimage: &Preimage) -> Hash {
    let result: [u8; 32] = Sha256::digest(preimage.as_bytes()).into();
    Hash(result)
}

/// Check that `SHA256(preimage) == expected` in constant time.
pub fn verify_preimage(preimage: &Preimage, expected: &Hash) -> bool {
    let computed = payment_hash(preimage);
    computed.0.ct_eq(&expected.0).into()
}
