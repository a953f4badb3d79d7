//! Recomputing a macaroon's signature chain.

use lsat_crypto::{bind_third_party, chain_caveat, derive_macaroon_key, hmac_sha256, RootKey, Signature};
use lsat_wire::RawMacaroon;

use crate::error::TokenResult;

/// Compute the signature a macaroon should carry under `root_key`.
///
/// Walks identifier then caveats in order. Third-party caveats are bound
/// with their verification id; first-party caveats are chained directly.
pub fn signature_chain(root_key: &RootKey, macaroon: &RawMacaroon) -> TokenResult<Signature> {
    let key = derive_macaroon_key(root_key)?;
    let mut signature = hmac_sha256(key.as_bytes(), &macaroon.identifier)?;

    for caveat in &macaroon.caveats {
        signature = match &caveat.verification_id {
            Some(vid) => bind_third_party(&signature, vid, &caveat.id)?,
            None => chain_caveat(&signature, &caveat.id)?,
        };
    }

    Ok(signature)
}
