//! Macaroon signature chain.
//!
//! Signatures follow the standard macaroon construction:
//! ```text
//! K      = HMAC("macaroons-key-generator", root_key)
//! sig_0  = HMAC(K, identifier)
//! sig_n  = HMAC(sig_{n-1}, caveat_n)                               (first party)
//! sig_n  = HMAC(sig_{n-1}, HMAC(sig_{n-1}, vid) || HMAC(sig_{n-1}, cid)) (third party)
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::CryptoError;
use crate::{RootKey, Signature};

type HmacSha256 = Hmac<Sha256>;

/// Fixed key used to derive the macaroon signing key from a root key.
const KEY_GENERATOR: &[u8] = b"macaroons-key-generator";

/// Compute `HMAC-SHA256(key, data)`.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Signature, CryptoError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CryptoError::InvalidMacKey(e.to_string()))?;
    mac.update(data);
    Ok(Signature(mac.finalize().into_bytes().into()))
}

/// Derive the signing key for a macaroon from its root key.
pub fn derive_macaroon_key(root_key: &RootKey) -> Result<Signature, CryptoError> {
    hmac_sha256(KEY_GENERATOR, root_key.as_bytes())
}

/// Extend a signature chain with a first-party caveat.
pub fn chain_caveat(previous: &Signature, caveat: &[u8]) -> Result<Signature, CryptoError> {
    hmac_sha256(&previous.0, caveat)
}

/// Extend a signature chain with a third-party caveat.
pub fn bind_third_party(
    previous: &Signature,
    verification_id: &[u8],
    caveat_id: &[u8],
) -> Result<Signature, CryptoError> {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(&hmac_sha256(&previous.0, verification_id)?.0);
    data[32..].copy_from_slice(&hmac_sha256(&previous.0, caveat_id)?.0);
    hmac_sha256(&previous.0, &data)
}

/// Compare two signatures without leaking the position of the first difference.
pub fn constant_time_eq(a: &Signature, b: &Signature) -> bool {
    a.0.ct_eq(&b.0).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(hex_str: &str) -> Signature {
        Signature::from_slice(&hex::decode(hex_str).unwrap()).unwrap()
    }

    #[test]
    fn test_derive_key_vector() {
        let root = RootKey::from_bytes(b"ABDEGHKLMPTC".to_vec()).unwrap();
        let derived = derive_macaroon_key(&root).unwrap();
        assert_eq!(
            derived,
            sig("4a82d7332191d7969e92cf2db1982d115f6af45834366443949d75c8866c059f")
        );
    }

    #[test]
    fn test_chain_vector() {
        let root = RootKey::from_bytes(b"ABDEGHKLMPTC".to_vec()).unwrap();
        let key = derive_macaroon_key(&root).unwrap();
        let base = hmac_sha256(&key.0, b"id").unwrap();
        assert_eq!(
            base,
            sig("01d189ba1f3518973c342478399337ffe16f030f3fd51a82b22e6862c9287675")
        );

        let next = chain_caveat(&base, b"RequestPath=/protected").unwrap();
        assert_eq!(
            next,
            sig("00a491335239c288958fe6e4dfdcfbbf791778b1fd48056cadfab60d7776f5ee")
        );
    }

    #[test]
    fn test_third_party_binding_vector() {
        let base = sig("01d189ba1f3518973c342478399337ffe16f030f3fd51a82b22e6862c9287675");
        let bound = bind_third_party(&base, b"vid", b"cid").unwrap();
        assert_eq!(
            bound,
            sig("7d1dda953ecc94023a4bdcfaad26a2af21b29576dc8b955ac6e8f547424ebf65")
        );
    }

    #[test]
    fn test_chain_order_matters() {
        let base = Signature([3u8; 32]);
        let ab = chain_caveat(&chain_caveat(&base, b"a=1").unwrap(), b"b=2").unwrap();
        let ba = chain_caveat(&chain_caveat(&base, b"b=2").unwrap(), b"a=1").unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_constant_time_eq() {
        let a = Signature([1u8; 32]);
        let mut b = a;
        assert!(constant_time_eq(&a, &b));
        b.0[31] ^= 0x01;
        assert!(!constant_time_eq(&a, &b));
    }
}
