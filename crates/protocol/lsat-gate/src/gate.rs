//! The access gate state machine.
//!
//! One call to [`AccessGate::handle`] per request:
//!
//! ```text
//! Authorization parses?
//!   yes -> verify (keyring, static + request caveats, preimage)
//!            ok  -> Paid
//!            err -> Error
//!   no  -> Accept contains marker?
//!            yes -> price, issue invoice, mint -> ChallengeIssued (or Error)
//!            no  -> Free
//! ```

use std::sync::Arc;

use lsat_crypto::RootKey;
use lsat_macaroon::{Minter, TokenError, Verifier};
use lsat_types::{Caveat, RequiredCaveats, ACCEPT_MARKER};
use lsat_wire::{accepts_lsat, parse_authorization, Credential};
use tracing::{debug, info, warn};

use crate::config::GateConfig;
use crate::error::{GateError, GateResult};
use crate::issuer::InvoiceIssuer;
use crate::policy::{AmountPolicy, CaveatPolicy, FixedPrice, NoRequestCaveats, PathCaveat};
use crate::types::{AccessOutcome, Challenge, PaidAccess, RequestContext};

/// Gates requests behind Lightning payments.
///
/// Cheap to share: wrap in an `Arc` and call [`handle`](Self::handle) from
/// any number of tasks. Configuration is read-only after construction.
pub struct AccessGate {
    minter: Minter,
    verifier: Verifier,
    static_caveats: Vec<Caveat>,
    accept_marker: String,
    issuer: Arc<dyn InvoiceIssuer>,
    amount_policy: Arc<dyn AmountPolicy>,
    caveat_policy: Arc<dyn CaveatPolicy>,
}

impl AccessGate {
    /// Create a gate. The first key mints; every key verifies.
    ///
    /// Defaults: 1 sat per request, tokens bound to the request path, the
    /// standard Accept marker, no static caveats.
    pub fn new(root_keys: Vec<RootKey>, issuer: Arc<dyn InvoiceIssuer>) -> GateResult<Self> {
        let minting_key = root_keys
            .first()
            .cloned()
            .ok_or_else(|| GateError::Config("no root key configured".to_string()))?;
        Ok(Self {
            minter: Minter::new(minting_key),
            verifier: Verifier::with_keys(root_keys)?,
            static_caveats: Vec::new(),
            accept_marker: ACCEPT_MARKER.to_string(),
            issuer,
            amount_policy: Arc::new(FixedPrice::default()),
            caveat_policy: Arc::new(PathCaveat),
        })
    }

    /// Create a gate from configuration, building its configured backend.
    pub fn from_config(config: &GateConfig) -> GateResult<Self> {
        Self::from_config_with_issuer(config, config.issuer()?)
    }

    /// Create a gate from configuration with an explicit issuer.
    pub fn from_config_with_issuer(
        config: &GateConfig,
        issuer: Arc<dyn InvoiceIssuer>,
    ) -> GateResult<Self> {
        let gate = Self::new(config.root_keys()?, issuer)?
            .with_static_caveats(config.static_caveats()?)
            .with_accept_marker(config.accept_marker.clone())
            .with_amount_policy(FixedPrice(config.price_sats));
        Ok(if config.path_caveat {
            gate.with_caveat_policy(PathCaveat)
        } else {
            gate.with_caveat_policy(NoRequestCaveats)
        })
    }

    /// Caveats added to every token and required on every request.
    pub fn with_static_caveats(mut self, caveats: Vec<Caveat>) -> Self {
        self.static_caveats = caveats;
        self
    }

    /// Accept header marker that opts clients into challenges.
    pub fn with_accept_marker(mut self, marker: impl Into<String>) -> Self {
        self.accept_marker = marker.into();
        self
    }

    /// Set the pricing policy.
    pub fn with_amount_policy(mut self, policy: impl AmountPolicy + 'static) -> Self {
        self.amount_policy = Arc::new(policy);
        self
    }

    /// Set the per-request caveat policy.
    pub fn with_caveat_policy(mut self, policy: impl CaveatPolicy + 'static) -> Self {
        self.caveat_policy = Arc::new(policy);
        self
    }

    /// Static caveats followed by the request's own caveats.
    pub fn caveats_for(&self, request: &RequestContext) -> Vec<Caveat> {
        let mut caveats = self.static_caveats.clone();
        caveats.extend(self.caveat_policy.request_caveats(request));
        caveats
    }

    /// What a token must carry to unlock this request.
    pub fn required_caveats(&self, request: &RequestContext) -> RequiredCaveats {
        self.caveats_for(request).into_iter().collect()
    }

    /// Decide what to do with one request.
    pub async fn handle(&self, request: &RequestContext) -> AccessOutcome {
        let credential = match request.authorization.as_deref().map(str::trim) {
            Some(header) if !header.is_empty() => match parse_authorization(header) {
                Ok(credential) => Some(credential),
                Err(e) => {
                    debug!(path = %request.path, error = %e, "Ignoring unparseable credential");
                    None
                }
            },
            _ => None,
        };

        match credential {
            Some(credential) => self.verify(request, credential),
            None if accepts_lsat(request.accept.as_deref(), &self.accept_marker) => {
                self.challenge(request).await
            }
            None => {
                debug!(path = %request.path, "Serving free content");
                AccessOutcome::Free
            }
        }
    }

    fn verify(&self, request: &RequestContext, credential: Credential) -> AccessOutcome {
        let required = self.required_caveats(request);
        match self
            .verifier
            .verify_macaroon(&credential.macaroon, &required, &credential.preimage)
        {
            Ok(verified) => {
                info!(
                    path = %request.path,
                    payment_hash = %verified.identifier.payment_hash,
                    key_index = verified.key_index,
                    "Credential accepted"
                );
                AccessOutcome::Paid(PaidAccess {
                    preimage: credential.preimage,
                    payment_hash: verified.identifier.payment_hash,
                    identifier: verified.identifier,
                    caveats: verified.caveats,
                })
            }
            Err(e) => {
                let error = GateError::from(e);
                warn!(
                    path = %request.path,
                    code = %error.error_code(),
                    kind = ?error.kind(),
                    "Credential rejected"
                );
                AccessOutcome::Error(error)
            }
        }
    }

    async fn challenge(&self, request: &RequestContext) -> AccessOutcome {
        match self.try_challenge(request).await {
            Ok(challenge) => {
                info!(
                    path = %request.path,
                    backend = self.issuer.backend(),
                    payment_hash = %challenge.payment_hash,
                    amount_sats = challenge.amount_sats,
                    "Issued payment challenge"
                );
                AccessOutcome::ChallengeIssued(challenge)
            }
            Err(error) => {
                warn!(
                    path = %request.path,
                    backend = self.issuer.backend(),
                    code = %error.error_code(),
                    error = %error,
                    "Failed to issue challenge"
                );
                AccessOutcome::Error(error)
            }
        }
    }

    async fn try_challenge(&self, request: &RequestContext) -> GateResult<Challenge> {
        let amount_sats = self.amount_policy.price(request);
        if amount_sats < 0 {
            return Err(GateError::InvalidAmount {
                amount_sats,
                reason: "amount cannot be negative".to_string(),
            });
        }

        // Refuse before the backend creates an invoice nobody could redeem.
        let caveats = self.caveats_for(request);
        if let Some(bad) = caveats.iter().find(|c| !c.is_well_formed()) {
            return Err(TokenError::AmbiguousCaveat(bad.encode()).into());
        }

        let invoice = self.issuer.issue(amount_sats).await?;
        let minted = self.minter.mint(invoice.payment_hash, &caveats)?;

        Ok(Challenge {
            token: minted.token,
            invoice: invoice.payment_request,
            payment_hash: invoice.payment_hash,
            amount_sats,
        })
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("keys", &self.verifier.key_count())
            .field("static_caveats", &self.static_caveats)
            .field("accept_marker", &self.accept_marker)
            .field("backend", &self.issuer.backend())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::Invoice;
    use async_trait::async_trait;
    use lsat_crypto::{payment_hash, Preimage};
    use lsat_wire::format_authorization;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubIssuer {
        preimage: Preimage,
        calls: AtomicUsize,
    }

    impl StubIssuer {
        fn new() -> Self {
            Self {
                preimage: Preimage::from_bytes([42u8; 32]),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl InvoiceIssuer for StubIssuer {
        async fn issue(&self, _amount_sats: i64) -> GateResult<Invoice> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Invoice {
                payment_request: "lnstub".to_string(),
                payment_hash: payment_hash(&self.preimage),
            })
        }

        fn backend(&self) -> &'static str {
            "stub"
        }
    }

    fn gate(issuer: Arc<StubIssuer>) -> AccessGate {
        AccessGate::new(vec![RootKey::from_bytes(b"gate-key".to_vec()).unwrap()], issuer).unwrap()
    }

    #[tokio::test]
    async fn test_free_without_marker() {
        let issuer = Arc::new(StubIssuer::new());
        let outcome = gate(issuer.clone())
            .handle(&RequestContext::new("/protected"))
            .await;
        assert_eq!(outcome, AccessOutcome::Free);
        assert_eq!(issuer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_challenge_then_paid() {
        let issuer = Arc::new(StubIssuer::new());
        let gate = gate(issuer.clone());
        let request = RequestContext::new("/protected").with_accept(ACCEPT_MARKER);

        let challenge = match gate.handle(&request).await {
            AccessOutcome::ChallengeIssued(c) => c,
            other => panic!("expected challenge, got {:?}", other),
        };
        assert_eq!(issuer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(challenge.invoice, "lnstub");
        assert_eq!(challenge.amount_sats, 1);

        let paid = RequestContext::new("/protected")
            .with_authorization(format_authorization(&challenge.token, &issuer.preimage));
        match gate.handle(&paid).await {
            AccessOutcome::Paid(access) => {
                assert_eq!(access.payment_hash, challenge.payment_hash);
                assert_eq!(access.caveats, vec![Caveat::new("RequestPath", "/protected")]);
            }
            other => panic!("expected paid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_negative_price_skips_issuer() {
        let issuer = Arc::new(StubIssuer::new());
        let gate = gate(issuer.clone()).with_amount_policy(FixedPrice(-5));
        let outcome = gate
            .handle(&RequestContext::new("/x").with_accept(ACCEPT_MARKER))
            .await;
        assert!(matches!(
            outcome,
            AccessOutcome::Error(GateError::InvalidAmount { amount_sats: -5, .. })
        ));
        assert_eq!(issuer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_authorization_is_absent() {
        let gate = gate(Arc::new(StubIssuer::new()));
        let outcome = gate
            .handle(&RequestContext::new("/x").with_authorization("   "))
            .await;
        assert_eq!(outcome, AccessOutcome::Free);
    }

    #[test]
    fn test_required_caveats_merge() {
        let gate = gate(Arc::new(StubIssuer::new()))
            .with_static_caveats(vec![Caveat::new("service", "api")]);
        let required = gate.required_caveats(&RequestContext::new("/a"));
        assert_eq!(required.get("service"), Some("api"));
        assert_eq!(required.get("RequestPath"), Some("/a"));
        assert_eq!(required.len(), 2);
    }

    #[test]
    fn test_new_requires_key() {
        let err = AccessGate::new(Vec::new(), Arc::new(StubIssuer::new())).unwrap_err();
        assert!(matches!(err, GateError::Config(_)));
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug = format!("{:?}", gate(Arc::new(StubIssuer::new())));
        assert!(debug.contains("keys: 1"));
        assert!(!debug.contains("gate-key"));
    }
}
