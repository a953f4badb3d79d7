//! Decoding a token for display, without verifying it.

use lsat_types::{Caveat, TokenIdentifier};
use lsat_wire::{decode_identifier, decode_token};
use serde::Serialize;

use crate::error::TokenResult;

/// A caveat as found in an unverified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectedCaveat {
    /// Caveat id, lossily decoded as UTF-8.
    pub raw: String,
    /// Decoded first-party caveat, if it decodes.
    pub caveat: Option<Caveat>,
    /// Whether the caveat has a verification id.
    pub third_party: bool,
    /// Location hint, if any.
    pub location: Option<String>,
}

/// Unverified contents of a token.
///
/// Nothing here is authenticated: the token may be forged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInspection {
    /// Macaroon location hint.
    pub location: Option<String>,
    /// Decoded identifier, if it is an LSAT identifier.
    pub identifier: Option<TokenIdentifier>,
    /// Why the identifier did not decode.
    pub identifier_error: Option<String>,
    /// Raw identifier length in bytes.
    pub identifier_len: usize,
    /// Caveats in chain order.
    pub caveats: Vec<InspectedCaveat>,
    /// Signature, hex.
    pub signature: String,
    /// Always false.
    pub verified: bool,
}

/// Decode a token without checking its signature.
pub fn inspect_token(token: &str) -> TokenResult<TokenInspection> {
    let macaroon = decode_token(token)?;

    let (identifier, identifier_error) = match decode_identifier(&macaroon.identifier) {
        Ok(id) => (Some(id), None),
        Err(e) => (None, Some(e.to_string())),
    };

    let caveats = macaroon
        .caveats
        .iter()
        .map(|c| {
            let raw = String::from_utf8_lossy(&c.id).into_owned();
            InspectedCaveat {
                caveat: if c.is_third_party() {
                    None
                } else {
                    Caveat::decode(&raw).ok()
                },
                raw,
                third_party: c.is_third_party(),
                location: c.location.clone(),
            }
        })
        .collect();

    Ok(TokenInspection {
        location: macaroon.location.clone(),
        identifier,
        identifier_error,
        identifier_len: macaroon.identifier.len(),
        caveats,
        signature: macaroon.signature.to_hex(),
        verified: false,
    })
}
