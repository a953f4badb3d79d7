//! LND REST invoice issuer.

use std::time::Duration;

use async_trait::async_trait;
use lsat_crypto::Hash;
use lsat_wire::decode_base64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_amount, http_client, Invoice, InvoiceIssuer};
use crate::error::{GateError, GateResult};

/// Issues invoices from an LND node via `POST /v1/invoices`.
pub struct LndIssuer {
    client: Client,
    rest_url: String,
    macaroon_hex: String,
    memo: String,
}

#[derive(Serialize)]
struct AddInvoiceRequest<'a> {
    value: String,
    memo: &'a str,
}

#[derive(Deserialize)]
struct AddInvoiceResponse {
    r_hash: String,
    payment_request: String,
}

impl LndIssuer {
    /// Create an issuer for the node at `rest_url`, authenticated with an
    /// invoice macaroon in hex.
    pub fn new(
        rest_url: impl Into<String>,
        macaroon_hex: impl Into<String>,
        memo: impl Into<String>,
        timeout: Duration,
    ) -> GateResult<Self> {
        let rest_url = rest_url.into();
        let macaroon_hex = macaroon_hex.into();
        if rest_url.trim().is_empty() {
            return Err(GateError::Config("LND REST URL cannot be empty".to_string()));
        }
        if macaroon_hex.trim().is_empty() {
            return Err(GateError::Config("LND macaroon cannot be empty".to_string()));
        }

        Ok(Self {
            client: http_client(timeout)?,
            rest_url: rest_url.trim_end_matches('/').to_string(),
            macaroon_hex,
            memo: memo.into(),
        })
    }

    /// The node URL.
    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }
}

impl std::fmt::Debug for LndIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LndIssuer")
            .field("rest_url", &self.rest_url)
            .field("macaroon_hex", &"[REDACTED]")
            .field("memo", &self.memo)
            .finish()
    }
}

#[async_trait]
impl InvoiceIssuer for LndIssuer {
    async fn issue(&self, amount_sats: i64) -> GateResult<Invoice> {
        let value = check_amount(amount_sats)?;
        let url = format!("{}/v1/invoices", self.rest_url);

        debug!(url = %url, amount_sats, "Requesting invoice from LND");

        let response = self
            .client
            .post(&url)
            .header("Grpc-Metadata-macaroon", &self.macaroon_hex)
            .json(&AddInvoiceRequest {
                value: value.to_string(),
                memo: &self.memo,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GateError::issuance(format!(
                "LND returned {}: {}",
                status, body
            )));
        }

        let added: AddInvoiceResponse = response
            .json()
            .await
            .map_err(|e| GateError::issuance(format!("unreadable LND response: {}", e)))?;

        let hash_bytes = decode_base64(&added.r_hash)
            .map_err(|e| GateError::InvalidInvoice(format!("r_hash: {}", e)))?;
        let payment_hash = Hash::from_slice(&hash_bytes)
            .map_err(|e| GateError::InvalidInvoice(format!("r_hash: {}", e)))?;

        Ok(Invoice {
            payment_request: added.payment_request,
            payment_hash,
        })
    }

    fn backend(&self) -> &'static str {
        "lnd"
    }
}
