//! Verifying LSAT macaroons against a keyring.

use lsat_crypto::{constant_time_eq, verify_preimage, Preimage, RootKey};
use lsat_types::{verify_presented, Caveat, RequiredCaveats, TokenIdentifier};
use lsat_wire::{decode_identifier, decode_token, RawMacaroon};
use tracing::debug;

use crate::chain::signature_chain;
use crate::error::{TokenError, TokenResult};

/// A token that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// The decoded identifier.
    pub identifier: TokenIdentifier,
    /// First-party caveats carried by the token that decode, in order.
    pub caveats: Vec<Caveat>,
    /// Position in the keyring of the key that signed the token.
    pub key_index: usize,
}

/// Verifies tokens against an ordered list of root keys.
///
/// Keys are tried in order; the first whose signature chain matches is used.
/// Holding more than one key allows rotation: mint with the new key while
/// older tokens still verify.
#[derive(Debug, Clone)]
pub struct Verifier {
    keys: Vec<RootKey>,
}

impl Verifier {
    /// Create a verifier with a single root key.
    pub fn new(root_key: RootKey) -> Self {
        Self {
            keys: vec![root_key],
        }
    }

    /// Create a verifier from a keyring. Fails if the keyring is empty.
    pub fn with_keys(keys: Vec<RootKey>) -> TokenResult<Self> {
        if keys.is_empty() {
            return Err(TokenError::NoRootKey);
        }
        Ok(Self { keys })
    }

    /// Number of keys in the keyring.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Verify a token string.
    ///
    /// Checks, in order: structure, signature, third-party caveats, required
    /// caveats, identifier, preimage. Nothing from the token is trusted before
    /// the signature check passes.
    pub fn verify(
        &self,
        token: &str,
        required: &RequiredCaveats,
        preimage: &Preimage,
    ) -> TokenResult<VerifiedToken> {
        let macaroon = decode_token(token)?;
        self.verify_macaroon(&macaroon, required, preimage)
    }

    /// Verify an already-decoded envelope.
    pub fn verify_macaroon(
        &self,
        macaroon: &RawMacaroon,
        required: &RequiredCaveats,
        preimage: &Preimage,
    ) -> TokenResult<VerifiedToken> {
        let key_index = self.check_signature(macaroon)?;

        if let Some(position) = macaroon.caveats.iter().position(|c| c.is_third_party()) {
            return Err(TokenError::UndischargedCaveat(position));
        }

        let presented: Vec<&str> = macaroon
            .first_party_caveats()
            .filter_map(|id| std::str::from_utf8(id).ok())
            .collect();
        verify_presented(&presented, required)?;

        let identifier = decode_identifier(&macaroon.identifier)?;
        if !verify_preimage(preimage, &identifier.payment_hash) {
            return Err(TokenError::InvalidPreimage {
                preimage: preimage.to_hex(),
                payment_hash: identifier.payment_hash.to_hex(),
            });
        }

        Ok(VerifiedToken {
            identifier,
            caveats: presented
                .iter()
                .filter_map(|raw| Caveat::decode(raw).ok())
                .collect(),
            key_index,
        })
    }

    fn check_signature(&self, macaroon: &RawMacaroon) -> TokenResult<usize> {
        for (index, key) in self.keys.iter().enumerate() {
            let expected = signature_chain(key, macaroon)?;
            if constant_time_eq(&expected, &macaroon.signature) {
                if index > 0 {
                    debug!(key_index = index, "Token signed by a rotated root key");
                }
                return Ok(index);
            }
        }
        Err(TokenError::SignatureInvalid)
    }
}

/// Verify a token with a single root key.
pub fn verify(
    root_key: &RootKey,
    token: &str,
    required: &RequiredCaveats,
    preimage: &Preimage,
) -> TokenResult<VerifiedToken> {
    Verifier::new(root_key.clone()).verify(token, required, preimage)
}
