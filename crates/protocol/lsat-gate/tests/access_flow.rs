//! End-to-end access scenarios against a mock invoice backend.

use std::sync::Arc;

use lsat_crypto::{payment_hash, Preimage};
use lsat_gate::{
    AccessErrorKind, AccessGate, AccessOutcome, Challenge, FixedPrice, GateConfig, RequestContext,
    ResponseBody,
};
use lsat_test_utils::{authorization_for, other_root_key, test_gate, test_root_key, MockInvoiceIssuer};
use lsat_types::{Caveat, ACCEPT_MARKER};
use lsat_wire::{decode_token, encode_token, parse_challenge};

fn opted_in(path: &str) -> RequestContext {
    RequestContext::new(path).with_accept(format!("application/json, {}", ACCEPT_MARKER))
}

async fn issue_challenge(gate: &AccessGate, path: &str) -> Challenge {
    match gate.handle(&opted_in(path)).await {
        AccessOutcome::ChallengeIssued(c) => c,
        other => panic!("expected a challenge, got {:?}", other),
    }
}

fn paid_request(path: &str, token: &str, preimage: &Preimage) -> RequestContext {
    RequestContext::new(path).with_authorization(authorization_for(token, preimage))
}

#[tokio::test]
async fn test_no_header_no_marker_is_free() {
    let (gate, issuer) = test_gate();
    let outcome = gate
        .handle(&RequestContext::new("/protected").with_accept("text/html"))
        .await;
    assert_eq!(outcome, AccessOutcome::Free);
    assert_eq!(outcome.message(), "Free Content");
    assert_eq!(issuer.call_count(), 0);
}

#[tokio::test]
async fn test_marker_issues_challenge() {
    let (gate, issuer) = test_gate();
    let outcome = gate.handle(&opted_in("/protected")).await;
    assert_eq!(outcome.message(), "Payment Required");

    let challenge = match outcome {
        AccessOutcome::ChallengeIssued(c) => c,
        other => panic!("expected a challenge, got {:?}", other),
    };
    let header = challenge.www_authenticate();
    assert!(header.starts_with("LSAT "));
    assert!(header.contains("macaroon="));
    assert!(header.contains("invoice="));

    let parsed = parse_challenge(&header).unwrap();
    assert_eq!(parsed.macaroon, challenge.token);
    assert_eq!(parsed.invoice, challenge.invoice);

    assert_eq!(issuer.call_count(), 1);
    assert_eq!(issuer.issued_amounts(), vec![1]);
    assert!(issuer.preimage_for(&challenge.payment_hash).is_some());
}

#[tokio::test]
async fn test_valid_credential_is_paid() {
    let (gate, issuer) = test_gate();
    let challenge = issue_challenge(&gate, "/protected").await;
    let preimage = issuer.preimage_for(&challenge.payment_hash).unwrap();

    let outcome = gate
        .handle(&paid_request("/protected", &challenge.token, &preimage))
        .await;
    assert_eq!(outcome.message(), "Protected Content");
    match outcome {
        AccessOutcome::Paid(access) => {
            assert_eq!(access.preimage, preimage);
            assert_eq!(access.payment_hash, challenge.payment_hash);
            assert_eq!(access.identifier.payment_hash, challenge.payment_hash);
            assert_eq!(access.identifier.version, 0);
        }
        other => panic!("expected paid, got {:?}", other),
    }
    // Verification never touches the backend.
    assert_eq!(issuer.call_count(), 1);
}

#[tokio::test]
async fn test_wrong_preimage_is_error() {
    let (gate, _issuer) = test_gate();
    let challenge = issue_challenge(&gate, "/protected").await;
    let wrong = Preimage::from_bytes([0x11; 32]);

    let outcome = gate
        .handle(&paid_request("/protected", &challenge.token, &wrong))
        .await;
    let message = outcome.message();
    assert!(message.contains("Invalid Preimage"));
    assert!(message.contains(&challenge.payment_hash.to_hex()));
    assert!(message.contains(&wrong.to_hex()));
    match outcome {
        AccessOutcome::Error(e) => assert_eq!(e.kind(), AccessErrorKind::InvalidPreimage),
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_token_for_other_path_is_rejected() {
    let (gate, issuer) = test_gate();
    let challenge = issue_challenge(&gate, "/other").await;
    let preimage = issuer.preimage_for(&challenge.payment_hash).unwrap();

    let outcome = gate
        .handle(&paid_request("/protected", &challenge.token, &preimage))
        .await;
    assert_eq!(outcome.message(), "Caveats don't match");
    match outcome {
        AccessOutcome::Error(e) => assert_eq!(e.kind(), AccessErrorKind::CaveatMismatch),
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_tampered_signature_is_rejected() {
    let (gate, issuer) = test_gate();
    let challenge = issue_challenge(&gate, "/protected").await;
    let preimage = issuer.preimage_for(&challenge.payment_hash).unwrap();

    let mut macaroon = decode_token(&challenge.token).unwrap();
    macaroon.signature.0[0] ^= 0x01;
    let tampered = encode_token(&macaroon).unwrap();

    match gate
        .handle(&paid_request("/protected", &tampered, &preimage))
        .await
    {
        AccessOutcome::Error(e) => assert_eq!(e.kind(), AccessErrorKind::SignatureInvalid),
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unparseable_credential_routes_to_challenge() {
    let (gate, issuer) = test_gate();

    let outcome = gate
        .handle(&opted_in("/protected").with_authorization("LSAT not-a-credential"))
        .await;
    assert!(matches!(outcome, AccessOutcome::ChallengeIssued(_)));

    let outcome = gate
        .handle(&RequestContext::new("/protected").with_authorization("Bearer abc"))
        .await;
    assert_eq!(outcome, AccessOutcome::Free);
    assert_eq!(issuer.call_count(), 1);
}

#[tokio::test]
async fn test_issuer_failure_is_error() {
    let issuer = MockInvoiceIssuer::new().with_failure();
    let gate = AccessGate::new(vec![test_root_key()], Arc::new(issuer.clone())).unwrap();

    match gate.handle(&opted_in("/protected")).await {
        AccessOutcome::Error(e) => {
            assert_eq!(e.kind(), AccessErrorKind::InvoiceIssuance);
            assert!(!e.is_transient());
        }
        other => panic!("expected error, got {:?}", other),
    }
    assert_eq!(issuer.call_count(), 1);
}

#[tokio::test]
async fn test_rotated_key_still_verifies() {
    let issuer = MockInvoiceIssuer::new();
    let old_gate = AccessGate::new(vec![other_root_key()], Arc::new(issuer.clone())).unwrap();
    let challenge = issue_challenge(&old_gate, "/protected").await;
    let preimage = issuer.preimage_for(&challenge.payment_hash).unwrap();

    let rotated = AccessGate::new(
        vec![test_root_key(), other_root_key()],
        Arc::new(issuer.clone()),
    )
    .unwrap();
    let outcome = rotated
        .handle(&paid_request("/protected", &challenge.token, &preimage))
        .await;
    assert!(outcome.is_paid());

    // A gate that dropped the old key rejects it.
    let (fresh, _) = test_gate();
    match fresh
        .handle(&paid_request("/protected", &challenge.token, &preimage))
        .await
    {
        AccessOutcome::Error(e) => assert_eq!(e.kind(), AccessErrorKind::SignatureInvalid),
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_static_caveats_are_enforced() {
    let issuer = MockInvoiceIssuer::new();
    let plain = AccessGate::new(vec![test_root_key()], Arc::new(issuer.clone())).unwrap();
    let strict = AccessGate::new(vec![test_root_key()], Arc::new(issuer.clone()))
        .unwrap()
        .with_static_caveats(vec![Caveat::new("service", "premium")]);

    let challenge = issue_challenge(&plain, "/protected").await;
    let preimage = issuer.preimage_for(&challenge.payment_hash).unwrap();
    let outcome = strict
        .handle(&paid_request("/protected", &challenge.token, &preimage))
        .await;
    assert_eq!(outcome.message(), "Caveats don't match");

    let challenge = issue_challenge(&strict, "/protected").await;
    let preimage = issuer.preimage_for(&challenge.payment_hash).unwrap();
    match strict
        .handle(&paid_request("/protected", &challenge.token, &preimage))
        .await
    {
        AccessOutcome::Paid(access) => {
            assert!(access.caveats.contains(&Caveat::new("service", "premium")));
            assert!(access.caveats.contains(&Caveat::new("RequestPath", "/protected")));
        }
        other => panic!("expected paid, got {:?}", other),
    }
}

#[tokio::test]
async fn test_amount_policy_prices_request() {
    let (gate, issuer) = test_gate();
    let gate = gate.with_amount_policy(|req: &RequestContext| -> i64 {
        if req.path.starts_with("/premium") {
            100
        } else {
            10
        }
    });

    let premium = issue_challenge(&gate, "/premium/report").await;
    let basic = issue_challenge(&gate, "/basic").await;
    assert_eq!(premium.amount_sats, 100);
    assert_eq!(basic.amount_sats, 10);
    assert_eq!(issuer.issued_amounts(), vec![100, 10]);
}

#[tokio::test]
async fn test_zero_price_still_challenges() {
    let (gate, issuer) = test_gate();
    let gate = gate.with_amount_policy(FixedPrice(0));
    let challenge = issue_challenge(&gate, "/protected").await;
    assert_eq!(challenge.amount_sats, 0);
    assert_eq!(issuer.issued_amounts(), vec![0]);
}

#[tokio::test]
async fn test_gate_from_toml_config() {
    let config: GateConfig = toml::from_str(&format!(
        r#"
root_keys = ["{}"]
caveats = ["service=api"]
accept_marker = "application/x-lsat"
path_caveat = false
price_sats = 5
"#,
        test_root_key().to_hex()
    ))
    .unwrap();

    let issuer = MockInvoiceIssuer::new();
    let gate = AccessGate::from_config_with_issuer(&config, Arc::new(issuer.clone())).unwrap();

    // The default marker no longer opts in.
    assert_eq!(gate.handle(&opted_in("/a")).await, AccessOutcome::Free);

    let request = RequestContext::new("/a").with_accept("application/x-lsat");
    let challenge = match gate.handle(&request).await {
        AccessOutcome::ChallengeIssued(c) => c,
        other => panic!("expected a challenge, got {:?}", other),
    };
    assert_eq!(challenge.amount_sats, 5);

    // Without path binding, the token unlocks any path.
    let preimage = issuer.preimage_for(&challenge.payment_hash).unwrap();
    let outcome = gate
        .handle(&paid_request("/b", &challenge.token, &preimage))
        .await;
    assert!(outcome.is_paid());
}

#[tokio::test]
async fn test_response_body_for_outcomes() {
    let (gate, issuer) = test_gate();
    let challenge = issue_challenge(&gate, "/protected").await;
    let preimage = issuer.preimage_for(&challenge.payment_hash).unwrap();
    assert_eq!(payment_hash(&preimage), challenge.payment_hash);

    let outcome = gate
        .handle(&paid_request("/protected", &challenge.token, &preimage))
        .await;
    assert_eq!(
        ResponseBody::for_outcome(&outcome, 200),
        ResponseBody::new(200, "Protected Content")
    );
}

#[tokio::test]
async fn test_path_with_delimiter_can_be_paid() {
    let (gate, issuer) = test_gate();
    let challenge = issue_challenge(&gate, "/files/a=b").await;
    assert_eq!(issuer.call_count(), 1);

    let preimage = issuer.preimage_for(&challenge.payment_hash).unwrap();
    let outcome = gate
        .handle(&paid_request("/files/a=b", &challenge.token, &preimage))
        .await;
    assert!(outcome.is_paid(), "got {:?}", outcome);

    // the escaped spelling of the same path is a different resource
    let outcome = gate
        .handle(&paid_request("/files/a%3Db", &challenge.token, &preimage))
        .await;
    assert_eq!(outcome.message(), "Caveats don't match");
}

#[tokio::test]
async fn test_unmintable_caveat_issues_no_invoice() {
    let (gate, issuer) = test_gate();
    let gate = gate.with_caveat_policy(|req: &RequestContext| {
        vec![Caveat::new("Query", format!("{}?a=b", req.path))]
    });

    match gate.handle(&opted_in("/search")).await {
        AccessOutcome::Error(e) => {
            assert_eq!(e.kind(), AccessErrorKind::Config);
            assert_eq!(e.error_code(), lsat_types::ErrorCode::MalformedCaveat);
        }
        other => panic!("expected error, got {:?}", other),
    }
    assert_eq!(issuer.call_count(), 0);
}
