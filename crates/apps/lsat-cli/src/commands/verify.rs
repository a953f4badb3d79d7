//! Verify token command.

use lsat_macaroon::Verifier;
use lsat_types::RequiredCaveats;

use crate::config::CliConfig;
use crate::context::{caveats_with_static, parse_preimage, root_keys};
use crate::error::CliResult;
use crate::output::{OutputFormat, Render, VerifyOutput};

/// Execute the verify command.
///
/// Checks the token against every configured root key, the required caveats
/// (static plus command line) and the preimage. Any failure is an error.
pub fn verify(
    config: &CliConfig,
    format: OutputFormat,
    token: &str,
    preimage: &str,
    caveats: &[String],
) -> CliResult<String> {
    let preimage = parse_preimage(preimage)?;
    let required: RequiredCaveats = caveats_with_static(config, caveats)?.into_iter().collect();

    let verifier = Verifier::with_keys(root_keys(config)?)?;
    let verified = verifier.verify(token.trim(), &required, &preimage)?;

    let output = VerifyOutput {
        valid: true,
        payment_hash: verified.identifier.payment_hash.to_hex(),
        token_id: verified.identifier.token_id.to_hex(),
        key_index: verified.key_index,
        caveats: verified.caveats,
    };

    Ok(output.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use lsat_crypto::{payment_hash, Preimage, RootKey};
    use lsat_macaroon::{Minter, TokenError};
    use lsat_types::{Caveat, ErrorCode};

    struct Fixture {
        config: CliConfig,
        token: String,
        preimage: Preimage,
    }

    fn fixture(caveats: &[Caveat]) -> Fixture {
        let key = RootKey::from_bytes(b"verify-key".to_vec()).unwrap();
        let preimage = Preimage::from_bytes([8u8; 32]);
        let minted = Minter::new(key.clone())
            .mint(payment_hash(&preimage), caveats)
            .unwrap();

        let mut config = CliConfig::default();
        config.gate.root_keys = vec![key.to_hex()];
        Fixture {
            config,
            token: minted.token,
            preimage,
        }
    }

    #[test]
    fn test_verify_valid() {
        let f = fixture(&[Caveat::new("RequestPath", "/a")]);
        let output = verify(
            &f.config,
            OutputFormat::Json,
            &f.token,
            &f.preimage.to_hex(),
            &["RequestPath=/a".to_string()],
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["key_index"], 0);
    }

    #[test]
    fn test_verify_wrong_preimage() {
        let f = fixture(&[]);
        let result = verify(
            &f.config,
            OutputFormat::Human,
            &f.token,
            &"00".repeat(32),
            &[],
        );
        let err = result.unwrap_err();
        assert!(matches!(err, CliError::Token(TokenError::InvalidPreimage { .. })));
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.error_code(), ErrorCode::InvalidPreimage);
    }

    #[test]
    fn test_verify_caveat_mismatch() {
        let f = fixture(&[Caveat::new("RequestPath", "/a")]);
        let result = verify(
            &f.config,
            OutputFormat::Human,
            &f.token,
            &f.preimage.to_hex(),
            &["RequestPath=/b".to_string()],
        );
        assert!(matches!(result, Err(CliError::Token(_))));
    }

    #[test]
    fn test_verify_rotated_key() {
        let mut f = fixture(&[]);
        let new_key = RootKey::from_bytes(b"new-key".to_vec()).unwrap();
        f.config.gate.root_keys.insert(0, new_key.to_hex());

        let output = verify(
            &f.config,
            OutputFormat::Human,
            &f.token,
            &f.preimage.to_hex(),
            &[],
        )
        .unwrap();
        assert!(output.contains("rotated key #1"));
    }

    #[test]
    fn test_verify_bad_preimage_hex() {
        let f = fixture(&[]);
        let err = verify(&f.config, OutputFormat::Human, &f.token, "xyz", &[]).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidPreimage);
    }
}
