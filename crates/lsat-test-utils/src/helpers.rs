//! Helper functions for creating test fixtures.

use lsat_crypto::{Preimage, RootKey};
use lsat_gate::AccessGate;
use lsat_wire::format_authorization;
use std::sync::Arc;

use crate::MockInvoiceIssuer;

/// A fixed root key for deterministic tests.
pub fn test_root_key() -> RootKey {
    RootKey::from_bytes(b"lsat-test-root-key".to_vec()).unwrap()
}

/// A second fixed root key, for rotation and wrong-key tests.
pub fn other_root_key() -> RootKey {
    RootKey::from_bytes(b"lsat-other-root-key".to_vec()).unwrap()
}

/// An access gate with the test root key and default policies, plus a
/// handle on its mock issuer.
pub fn test_gate() -> (AccessGate, MockInvoiceIssuer) {
    let issuer = MockInvoiceIssuer::new();
    let gate = AccessGate::new(vec![test_root_key()], Arc::new(issuer.clone())).unwrap();
    (gate, issuer)
}

/// `Authorization` header value for a token and preimage.
pub fn authorization_for(token: &str, preimage: &Preimage) -> String {
    format_authorization(token, preimage)
}
