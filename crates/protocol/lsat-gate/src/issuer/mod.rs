//! Invoice issuers.
//!
//! The gate asks an [`InvoiceIssuer`] for a fresh invoice whenever it issues
//! a challenge. Two backends ship with the crate:
//!
//! - [`LndIssuer`] - an LND node over its REST API
//! - [`LnurlIssuer`] - a Lightning address via LNURL-pay
//!
//! Anything else (including test doubles) can implement the trait.

mod bolt11;
mod lnd;
mod lnurl;

pub use bolt11::{decode_bolt11, Bolt11};
pub use lnd::LndIssuer;
pub use lnurl::{LightningAddress, LnurlIssuer};

use std::time::Duration;

use async_trait::async_trait;
use lsat_crypto::Hash;

use crate::error::{GateError, GateResult};

/// Default timeout for backend requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An invoice returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    /// BOLT11 payment request.
    pub payment_request: String,
    /// Payment hash the invoice settles against.
    pub payment_hash: Hash,
}

/// Something that can create Lightning invoices.
#[async_trait]
pub trait InvoiceIssuer: Send + Sync {
    /// Create an invoice for `amount_sats` satoshis.
    async fn issue(&self, amount_sats: i64) -> GateResult<Invoice>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Reject amounts no backend can invoice.
pub(crate) fn check_amount(amount_sats: i64) -> GateResult<u64> {
    u64::try_from(amount_sats).map_err(|_| GateError::InvalidAmount {
        amount_sats,
        reason: "amount cannot be negative".to_string(),
    })
}

pub(crate) fn http_client(timeout: Duration) -> GateResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GateError::Config(format!("failed to build HTTP client: {}", e)))
}
