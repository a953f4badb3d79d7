//! Token strings: base64 over the macaroon envelope.
//!
//! Minted tokens use standard padded base64. Decoding is lenient: standard
//! or URL-safe alphabet, padded or not.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use lsat_types::constants::MAX_TOKEN_SIZE;

use crate::error::{DecodeError, EncodeError};
use crate::macaroon::RawMacaroon;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Encode a macaroon as a token string.
pub fn encode_token(macaroon: &RawMacaroon) -> Result<String, EncodeError> {
    Ok(STANDARD.encode(macaroon.encode()?))
}

/// Decode a token string into a macaroon envelope.
///
/// Nothing is verified: the result is untrusted until its signature checks.
pub fn decode_token(token: &str) -> Result<RawMacaroon, DecodeError> {
    RawMacaroon::decode(&decode_base64(token)?)
}

/// Decode base64 in either alphabet, with or without padding.
pub fn decode_base64(s: &str) -> Result<Vec<u8>, DecodeError> {
    let s = s.trim();
    // 4 encoded chars per 3 bytes, plus padding slack
    let max_encoded = MAX_TOKEN_SIZE.div_ceil(3) * 4;
    if s.len() > max_encoded {
        return Err(DecodeError::TooLarge {
            size: s.len() / 4 * 3,
            max: MAX_TOKEN_SIZE,
        });
    }

    let engine = if s.contains(|c: char| c == '-' || c == '_') {
        &LENIENT_URL_SAFE
    } else {
        &LENIENT_STANDARD
    };
    engine
        .decode(s)
        .map_err(|e| DecodeError::Base64(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macaroon::RawCaveat;
    use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
    use lsat_crypto::Signature;

    fn sample() -> RawMacaroon {
        RawMacaroon {
            location: Some("LSAT".into()),
            identifier: vec![0xfb; 66],
            caveats: vec![RawCaveat::first_party(b"tier=gold".to_vec())],
            signature: Signature::from_bytes([0xfe; 32]),
        }
    }

    #[test]
    fn test_encode_is_standard_padded() {
        let token = encode_token(&sample()).unwrap();
        assert_eq!(token, STANDARD.encode(sample().encode().unwrap()));
        assert!(!token.contains('-') && !token.contains('_'));
    }

    #[test]
    fn test_decode_accepts_url_safe_and_unpadded() {
        let bytes = sample().encode().unwrap();
        for token in [
            STANDARD.encode(&bytes),
            STANDARD.encode(&bytes).trim_end_matches('=').to_string(),
            URL_SAFE.encode(&bytes),
            URL_SAFE_NO_PAD.encode(&bytes),
        ] {
            assert_eq!(decode_token(&token).unwrap(), sample(), "token {token}");
        }
    }

    #[test]
    fn test_decode_trims_whitespace() {
        let token = format!("  {}\n", encode_token(&sample()).unwrap());
        assert_eq!(decode_token(&token).unwrap(), sample());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_token("not base64!"), Err(DecodeError::Base64(_))));
        assert!(decode_token("").is_err());
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let huge = "A".repeat(MAX_TOKEN_SIZE * 2);
        assert!(matches!(
            decode_base64(&huge),
            Err(DecodeError::TooLarge { .. })
        ));
    }
}
