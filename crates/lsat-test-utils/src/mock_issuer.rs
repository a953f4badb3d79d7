//! Mock implementation of the `InvoiceIssuer` trait for testing.
//!
//! Generates a random preimage per invoice and remembers it, so tests can
//! "pay" an invoice by looking the preimage up.

use async_trait::async_trait;
use lsat_crypto::{payment_hash, random_bytes, Hash, Preimage};
use lsat_gate::{GateError, GateResult, Invoice, InvoiceIssuer};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

struct MockIssuerInner {
    /// payment_hash -> preimage for every invoice issued.
    preimages: HashMap<Hash, Preimage>,
    /// Amounts requested, in call order.
    issued_amounts: Vec<i64>,
    /// When true, `issue` returns InvoiceIssuance.
    should_fail: bool,
    /// Number of `issue` calls, including failed ones.
    calls: usize,
}

/// A mock invoice backend.
///
/// Uses `Arc<RwLock<...>>` internally, so it is cheap to clone and
/// all clones share the same state.
#[derive(Clone)]
pub struct MockInvoiceIssuer {
    inner: Arc<RwLock<MockIssuerInner>>,
}

impl Default for MockInvoiceIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInvoiceIssuer {
    /// Create a mock that issues invoices successfully.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MockIssuerInner {
                preimages: HashMap::new(),
                issued_amounts: Vec::new(),
                should_fail: false,
                calls: 0,
            })),
        }
    }

    /// Configure the mock to fail every issuance.
    pub fn with_failure(self) -> Self {
        self.inner.write().unwrap().should_fail = true;
        self
    }

    /// Set the failure mode at runtime.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.inner.write().unwrap().should_fail = should_fail;
    }

    // =========================================================================
    // Assertion Helpers
    // =========================================================================

    /// The preimage that settles the invoice with this payment hash.
    pub fn preimage_for(&self, payment_hash: &Hash) -> Option<Preimage> {
        self.inner.read().unwrap().preimages.get(payment_hash).cloned()
    }

    /// Amounts requested so far.
    pub fn issued_amounts(&self) -> Vec<i64> {
        self.inner.read().unwrap().issued_amounts.clone()
    }

    /// Number of `issue` calls so far.
    pub fn call_count(&self) -> usize {
        self.inner.read().unwrap().calls
    }
}

#[async_trait]
impl InvoiceIssuer for MockInvoiceIssuer {
    async fn issue(&self, amount_sats: i64) -> GateResult<Invoice> {
        let mut inner = self.inner.write().unwrap();
        inner.calls += 1;
        if inner.should_fail {
            return Err(GateError::issuance("mock issuer configured to fail"));
        }

        let bytes: [u8; 32] = random_bytes(32).unwrap().try_into().unwrap();
        let preimage = Preimage::from_bytes(bytes);
        let hash = payment_hash(&preimage);
        inner.preimages.insert(hash, preimage);
        inner.issued_amounts.push(amount_sats);

        Ok(Invoice {
            payment_request: format!("lnmock{}n1{}", amount_sats, hash.to_hex()),
            payment_hash: hash,
        })
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}
