//! Minting LSAT macaroons.

use lsat_crypto::{Hash, RootKey, Signature};
use lsat_types::{Caveat, TokenIdentifier, MACAROON_LOCATION};
use lsat_wire::{encode_identifier, encode_token, RawCaveat, RawMacaroon};
use tracing::debug;

use crate::chain::signature_chain;
use crate::error::{TokenError, TokenResult};

/// A freshly minted token.
#[derive(Debug, Clone)]
pub struct MintedToken {
    /// Base64 token string, ready for a challenge header.
    pub token: String,
    /// The identifier embedded in the token.
    pub identifier: TokenIdentifier,
    /// The envelope the token string encodes.
    pub macaroon: RawMacaroon,
}

/// Mints tokens under a single root key.
///
/// # Example
/// ```
/// use lsat_crypto::{Hash, RootKey};
/// use lsat_macaroon::Minter;
/// use lsat_types::Caveat;
///
/// let minter = Minter::new(RootKey::from_bytes(b"secret".to_vec()).unwrap());
/// let minted = minter
///     .mint(Hash::from_bytes([1; 32]), &[Caveat::new("RequestPath", "/protected")])
///     .unwrap();
/// assert_eq!(minted.identifier.payment_hash, Hash::from_bytes([1; 32]));
/// ```
#[derive(Debug, Clone)]
pub struct Minter {
    root_key: RootKey,
    location: String,
}

impl Minter {
    /// Create a minter stamping tokens with the `LSAT` location.
    pub fn new(root_key: RootKey) -> Self {
        Self {
            root_key,
            location: MACAROON_LOCATION.to_string(),
        }
    }

    /// Override the location hint.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Mint a token bound to `payment_hash` with a fresh token id.
    pub fn mint(&self, payment_hash: Hash, caveats: &[Caveat]) -> TokenResult<MintedToken> {
        let identifier = TokenIdentifier::new(payment_hash)?;
        self.mint_with_identifier(identifier, caveats)
    }

    /// Mint a token for a given identifier.
    ///
    /// Caveats are chained in the order given. A caveat with an empty
    /// condition or containing `=` is rejected.
    pub fn mint_with_identifier(
        &self,
        identifier: TokenIdentifier,
        caveats: &[Caveat],
    ) -> TokenResult<MintedToken> {
        if let Some(bad) = caveats.iter().find(|c| !c.is_well_formed()) {
            return Err(TokenError::AmbiguousCaveat(bad.encode()));
        }

        let mut macaroon = RawMacaroon {
            location: Some(self.location.clone()),
            identifier: encode_identifier(&identifier),
            caveats: caveats
                .iter()
                .map(|c| RawCaveat::first_party(c.encode().into_bytes()))
                .collect(),
            signature: Signature::from_bytes([0u8; 32]),
        };
        macaroon.signature = signature_chain(&self.root_key, &macaroon)?;
        let token = encode_token(&macaroon)?;

        debug!(
            payment_hash = %identifier.payment_hash,
            token_id = %identifier.token_id,
            caveats = caveats.len(),
            "Minted token"
        );

        Ok(MintedToken {
            token,
            identifier,
            macaroon,
        })
    }
}

/// Mint a token with a one-off root key.
pub fn mint(root_key: &RootKey, payment_hash: Hash, caveats: &[Caveat]) -> TokenResult<MintedToken> {
    Minter::new(root_key.clone()).mint(payment_hash, caveats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsat_crypto::TokenId;
    use lsat_wire::{decode_identifier, decode_token};

    fn minter() -> Minter {
        Minter::new(RootKey::from_bytes(b"ABDEGHKLMPTC".to_vec()).unwrap())
    }

    #[test]
    fn test_mint_structure() {
        let minted = minter()
            .mint(Hash::from_bytes([9; 32]), &[Caveat::new("RequestPath", "/protected")])
            .unwrap();

        let mac = decode_token(&minted.token).unwrap();
        assert_eq!(mac, minted.macaroon);
        assert_eq!(mac.location.as_deref(), Some("LSAT"));
        assert_eq!(mac.caveats.len(), 1);
        assert_eq!(mac.caveats[0].id, b"RequestPath=/protected");
        assert_eq!(decode_identifier(&mac.identifier).unwrap(), minted.identifier);
    }

    #[test]
    fn test_mint_is_deterministic_for_identifier() {
        let id = TokenIdentifier::with_token_id(Hash::from_bytes([1; 32]), TokenId::from_bytes([2; 32]));
        let caveats = [Caveat::new("a", "1")];
        let a = minter().mint_with_identifier(id, &caveats).unwrap();
        let b = minter().mint_with_identifier(id, &caveats).unwrap();
        assert_eq!(a.token, b.token);
    }

    #[test]
    fn test_fresh_token_ids() {
        let hash = Hash::from_bytes([1; 32]);
        let a = minter().mint(hash, &[]).unwrap();
        let b = minter().mint(hash, &[]).unwrap();
        assert_ne!(a.identifier.token_id, b.identifier.token_id);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_rejects_ambiguous_caveats() {
        let hash = Hash::from_bytes([1; 32]);
        let err = minter()
            .mint(hash, &[Caveat::new("url", "https://x?a=b")])
            .unwrap_err();
        assert_eq!(err, TokenError::AmbiguousCaveat("url=https://x?a=b".into()));
        assert!(matches!(
            minter().mint(hash, &[Caveat::new("", "v")]),
            Err(TokenError::AmbiguousCaveat(_))
        ));
    }

    #[test]
    fn test_custom_location() {
        let minted = minter()
            .with_location("api.example")
            .mint(Hash::from_bytes([1; 32]), &[])
            .unwrap();
        assert_eq!(minted.macaroon.location.as_deref(), Some("api.example"));
    }
}
