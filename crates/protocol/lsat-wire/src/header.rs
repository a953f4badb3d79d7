//! `LSAT` HTTP header grammar.
//!
//! ```text
//! Authorization:    LSAT <base64 macaroon>:<hex preimage>
//! WWW-Authenticate: LSAT macaroon=<base64 macaroon>, invoice=<payment request>
//! ```

use lsat_crypto::Preimage;
use lsat_types::constants::{LSAT_SCHEME, PREIMAGE_HEX_LEN};

use crate::error::HeaderError;
use crate::macaroon::RawMacaroon;
use crate::token::decode_token;

/// A parsed `Authorization: LSAT ...` credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// The token string as presented.
    pub token: String,
    /// The decoded (unverified) macaroon.
    pub macaroon: RawMacaroon,
    /// The presented payment preimage.
    pub preimage: Preimage,
}

/// A parsed `WWW-Authenticate: LSAT ...` challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeHeader {
    /// Base64 token bound to the invoice.
    pub macaroon: String,
    /// BOLT11 payment request.
    pub invoice: String,
}

/// Parse an `Authorization` header value.
///
/// The scheme is matched case-insensitively. The preimage must be exactly 64
/// hex characters.
pub fn parse_authorization(header: &str) -> Result<Credential, HeaderError> {
    let rest = strip_scheme(header)?;

    let (token, preimage) = rest.split_once(':').ok_or(HeaderError::MissingDelimiter)?;
    let token = token.trim();
    let preimage = preimage.trim();

    if preimage.len() != PREIMAGE_HEX_LEN {
        return Err(HeaderError::InvalidPreimage(format!(
            "expected {} hex characters, got {}",
            PREIMAGE_HEX_LEN,
            preimage.len()
        )));
    }
    let preimage =
        Preimage::from_hex(preimage).map_err(|e| HeaderError::InvalidPreimage(e.to_string()))?;

    let macaroon = decode_token(token)?;

    Ok(Credential {
        token: token.to_string(),
        macaroon,
        preimage,
    })
}

/// Format an `Authorization` header value.
pub fn format_authorization(token: &str, preimage: &Preimage) -> String {
    format!("{} {}:{}", LSAT_SCHEME, token, preimage.to_hex())
}

/// Format a `WWW-Authenticate` header value.
pub fn format_challenge(token: &str, invoice: &str) -> String {
    format!("{} macaroon={}, invoice={}", LSAT_SCHEME, token, invoice)
}

/// Parse a `WWW-Authenticate` header value.
///
/// Parameter values may be quoted. Unknown parameters are ignored.
pub fn parse_challenge(header: &str) -> Result<ChallengeHeader, HeaderError> {
    let rest = strip_scheme(header)?;

    let mut macaroon = None;
    let mut invoice = None;
    for param in rest.split(',') {
        let Some((key, value)) = param.trim().split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').to_string();
        match key.trim() {
            "macaroon" => macaroon = Some(value),
            "invoice" => invoice = Some(value),
            _ => {}
        }
    }

    Ok(ChallengeHeader {
        macaroon: macaroon.ok_or(HeaderError::MissingParameter("macaroon"))?,
        invoice: invoice.ok_or(HeaderError::MissingParameter("invoice"))?,
    })
}

/// Whether an `Accept` header opts into the payment flow.
pub fn accepts_lsat(accept: Option<&str>, marker: &str) -> bool {
    accept.is_some_and(|accept| accept.contains(marker))
}

fn strip_scheme(header: &str) -> Result<&str, HeaderError> {
    let header = header.trim();
    if header.is_empty() {
        return Err(HeaderError::Empty);
    }

    let (scheme, rest) = header
        .split_once(char::is_whitespace)
        .unwrap_or((header, ""));
    if !scheme.eq_ignore_ascii_case(LSAT_SCHEME) {
        return Err(HeaderError::WrongScheme(scheme.to_string()));
    }
    Ok(rest.trim_start())
}
