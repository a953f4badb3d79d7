//! End-to-end minting and verification.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lsat_crypto::{payment_hash, Hash, Preimage, RootKey};
use lsat_macaroon::*;
use lsat_types::{Caveat, RequiredCaveats, REQUEST_PATH_CAVEAT};
use proptest::prelude::*;

fn root_key() -> RootKey {
    RootKey::from_bytes(b"ABDEGHKLMPTC".to_vec()).unwrap()
}

fn preimage() -> Preimage {
    Preimage::from_bytes([0x42; 32])
}

fn path_caveat(path: &str) -> Caveat {
    Caveat::new(REQUEST_PATH_CAVEAT, path)
}

fn required(caveats: &[Caveat]) -> RequiredCaveats {
    RequiredCaveats::from(caveats)
}

fn mint_for(path: &str) -> MintedToken {
    Minter::new(root_key())
        .mint(payment_hash(&preimage()), &[path_caveat(path)])
        .unwrap()
}

// =============================================================================
// Agreement
// =============================================================================

#[test]
fn minted_token_verifies() {
    let minted = mint_for("/protected");
    let verified = verify(
        &root_key(),
        &minted.token,
        &required(&[path_caveat("/protected")]),
        &preimage(),
    )
    .unwrap();
    assert_eq!(verified.identifier.payment_hash, payment_hash(&preimage()));
    assert_eq!(verified.key_index, 0);
}

proptest! {
    #[test]
    fn mint_verify_agree(
        key in proptest::collection::vec(any::<u8>(), 1..64),
        secret in any::<[u8; 32]>(),
        caveats in proptest::collection::vec(("[a-zA-Z]{1,12}", "[a-zA-Z0-9/._-]{0,24}"), 0..8),
    ) {
        let root = RootKey::from_bytes(key).unwrap();
        let preimage = Preimage::from_bytes(secret);
        let caveats: Vec<Caveat> = caveats.into_iter().map(|(c, v)| Caveat::new(c, v)).collect();

        let minted = mint(&root, payment_hash(&preimage), &caveats).unwrap();
        let result = verify(&root, &minted.token, &RequiredCaveats::from(caveats.as_slice()), &preimage);
        prop_assert!(result.is_ok(), "{:?}", result);
    }
}

// =============================================================================
// Tamper sensitivity
// =============================================================================

#[test]
fn any_signature_byte_flip_is_rejected() {
    let minted = mint_for("/protected");
    let bytes = STANDARD.decode(&minted.token).unwrap();
    let sig_start = bytes.len() - 32;

    for i in sig_start..bytes.len() {
        let mut tampered = bytes.clone();
        tampered[i] ^= 0x01;
        let err = verify(
            &root_key(),
            &STANDARD.encode(&tampered),
            &RequiredCaveats::new(),
            &preimage(),
        )
        .unwrap_err();
        assert_eq!(err, TokenError::SignatureInvalid, "byte {i}");
    }
}

#[test]
fn any_identifier_byte_flip_is_rejected() {
    let minted = mint_for("/protected");
    let bytes = STANDARD.decode(&minted.token).unwrap();
    // version, location field (1, 4, "LSAT"), identifier field header (2, 66)
    let id_start = 1 + 2 + 4 + 2;

    for i in id_start..id_start + 66 {
        let mut tampered = bytes.clone();
        tampered[i] ^= 0x80;
        let err = verify(
            &root_key(),
            &STANDARD.encode(&tampered),
            &RequiredCaveats::new(),
            &preimage(),
        )
        .unwrap_err();
        assert_eq!(err, TokenError::SignatureInvalid, "byte {i}");
    }
}

#[test]
fn caveat_byte_flip_is_rejected() {
    let minted = mint_for("/protected");
    let mut bytes = STANDARD.decode(&minted.token).unwrap();
    let pos = bytes
        .windows(b"/protected".len())
        .position(|w| w == b"/protected")
        .unwrap();
    bytes[pos + 1] = b'P';

    let err = verify(
        &root_key(),
        &STANDARD.encode(&bytes),
        &RequiredCaveats::new(),
        &preimage(),
    )
    .unwrap_err();
    assert_eq!(err, TokenError::SignatureInvalid);
}

#[test]
fn stripping_a_caveat_is_rejected() {
    let minted = Minter::new(root_key())
        .mint(
            payment_hash(&preimage()),
            &[path_caveat("/protected"), Caveat::new("tier", "gold")],
        )
        .unwrap();
    let mut macaroon = minted.macaroon.clone();
    macaroon.caveats.pop();
    let token = lsat_wire::encode_token(&macaroon).unwrap();

    let err = verify(&root_key(), &token, &RequiredCaveats::new(), &preimage()).unwrap_err();
    assert_eq!(err, TokenError::SignatureInvalid);
}

#[test]
fn wrong_root_key_is_rejected() {
    let minted = mint_for("/protected");
    let other = RootKey::from_bytes(b"another key".to_vec()).unwrap();
    let err = verify(&other, &minted.token, &RequiredCaveats::new(), &preimage()).unwrap_err();
    assert_eq!(err, TokenError::SignatureInvalid);
}

#[test]
fn malformed_token_is_parse_error() {
    let err = verify(&root_key(), "AgEE", &RequiredCaveats::new(), &preimage()).unwrap_err();
    assert!(matches!(err, TokenError::Parse(_)));
}

// =============================================================================
// Caveats
// =============================================================================

#[test]
fn token_for_other_path_does_not_match() {
    let minted = mint_for("/other");
    let err = verify(
        &root_key(),
        &minted.token,
        &required(&[path_caveat("/protected")]),
        &preimage(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Caveats don't match");
}

#[test]
fn extra_token_caveats_are_ignored() {
    let minted = Minter::new(root_key())
        .mint(
            payment_hash(&preimage()),
            &[path_caveat("/protected"), Caveat::new("tier", "gold")],
        )
        .unwrap();
    assert!(verify(
        &root_key(),
        &minted.token,
        &required(&[path_caveat("/protected")]),
        &preimage()
    )
    .is_ok());
}

#[test]
fn later_caveat_overrides_earlier() {
    let minted = Minter::new(root_key())
        .mint(
            payment_hash(&preimage()),
            &[Caveat::new("tier", "silver"), Caveat::new("tier", "gold")],
        )
        .unwrap();
    let gold = required(&[Caveat::new("tier", "gold")]);
    let silver = required(&[Caveat::new("tier", "silver")]);
    assert!(verify(&root_key(), &minted.token, &gold, &preimage()).is_ok());
    assert_eq!(
        verify(&root_key(), &minted.token, &silver, &preimage()).unwrap_err(),
        TokenError::CaveatMismatch
    );
}

#[test]
fn third_party_caveat_is_never_discharged() {
    let mut macaroon = mint_for("/protected").macaroon;
    macaroon.caveats.push(lsat_wire::RawCaveat {
        location: Some("https://auth.example".into()),
        id: b"cid".to_vec(),
        verification_id: Some(b"vid".to_vec()),
    });
    macaroon.signature = signature_chain(&root_key(), &macaroon).unwrap();
    let token = lsat_wire::encode_token(&macaroon).unwrap();

    let err = verify(&root_key(), &token, &RequiredCaveats::new(), &preimage()).unwrap_err();
    assert_eq!(err, TokenError::UndischargedCaveat(1));
}

// =============================================================================
// Preimage binding
// =============================================================================

#[test]
fn wrong_preimage_is_rejected_with_both_values() {
    let minted = mint_for("/protected");
    let wrong = Preimage::from_bytes([0x43; 32]);
    let err = verify(&root_key(), &minted.token, &RequiredCaveats::new(), &wrong).unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Invalid Preimage"));
    assert!(message.contains(&wrong.to_hex()));
    assert!(message.contains(&payment_hash(&preimage()).to_hex()));
}

#[test]
fn preimage_of_other_invoice_is_rejected() {
    let minted = Minter::new(root_key())
        .mint(Hash::from_bytes([0; 32]), &[])
        .unwrap();
    assert!(matches!(
        verify(&root_key(), &minted.token, &RequiredCaveats::new(), &preimage()),
        Err(TokenError::InvalidPreimage { .. })
    ));
}

// =============================================================================
// Tokens minted elsewhere
// =============================================================================

/// Signed with `ABDEGHKLMPTC`; identifier is not an LSAT identifier.
const FOREIGN_TOKEN: &str = "AgEETFNBVALgAUr/gQMBARJNYWNhcm9vbklkZW50aWZpZXIB/4IAAQMBB1ZlcnNpb24BBgABC1BheW1lbnRIYXNoAf+EAAEHVG9rZW5JZAH/hgAAABT/gwEBAQRIYXNoAf+EAAEGAUAAABn/hQEBAQlbMzJddWludDgB/4YAAQYBQAAAZf+CAiD/xkv/wP/aSkFQ/8//6f/lEWcMcE0NEAlSRGIkbX//6f+cAQr/2P+tSP+1ASD/0GQ0/5wELh//xP/gEv+O/65W//T/5f/5/5z/qP+/NBgcGf+W/+D/gf/iBf+iRv/W//MAAAIkUGF0aD1odHRwOi8vbG9jYWxob3N0OjgwODAvcHJvdGVjdGVkAAAGIM/NOETVID4fIo7y+mh6sutgLWf3GmtOb6is2rmfW5J5";

#[test]
fn foreign_signature_verifies_before_identifier_check() {
    let path = required(&[Caveat::new("Path", "http://localhost:8080/protected")]);
    let err = verify(&root_key(), FOREIGN_TOKEN, &path, &preimage()).unwrap_err();
    assert!(matches!(err, TokenError::Parse(_)), "{err:?}");
}

#[test]
fn foreign_token_caveats_checked_after_signature() {
    let other_path = required(&[Caveat::new("Path", "/other")]);
    let err = verify(&root_key(), FOREIGN_TOKEN, &other_path, &preimage()).unwrap_err();
    assert_eq!(err, TokenError::CaveatMismatch);

    let wrong_key = RootKey::from_bytes(b"ABDEGHKLMPTD".to_vec()).unwrap();
    let err = verify(&wrong_key, FOREIGN_TOKEN, &other_path, &preimage()).unwrap_err();
    assert_eq!(err, TokenError::SignatureInvalid);
}

#[test]
fn inspect_foreign_token() {
    let inspection = inspect_token(FOREIGN_TOKEN).unwrap();
    assert!(inspection.identifier.is_none());
    assert!(inspection.identifier_error.is_some());
    assert_eq!(inspection.identifier_len, 224);
    assert_eq!(
        inspection.caveats[0].caveat,
        Some(Caveat::new("Path", "http://localhost:8080/protected"))
    );
}
