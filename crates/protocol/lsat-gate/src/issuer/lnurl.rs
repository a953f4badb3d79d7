//! LNURL-pay invoice issuer for Lightning addresses.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{check_amount, decode_bolt11, http_client, Invoice, InvoiceIssuer};
use crate::error::{GateError, GateResult};

const PAY_REQUEST_TAG: &str = "payRequest";
const ERROR_STATUS: &str = "ERROR";

/// A Lightning address: `user@domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LightningAddress {
    /// Local part
    pub user: String,
    /// Host serving the LNURL endpoint
    pub domain: String,
}

impl LightningAddress {
    /// Parse `user@domain`. Both parts must be non-empty and `@` must appear once.
    pub fn parse(address: &str) -> GateResult<Self> {
        let address = address.trim();
        let mut parts = address.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(user), Some(domain), None) if !user.is_empty() && !domain.is_empty() => {
                Ok(Self {
                    user: user.to_string(),
                    domain: domain.to_string(),
                })
            }
            _ => Err(GateError::InvalidAddress(address.to_string())),
        }
    }

    /// The LNURL-pay metadata URL for this address.
    pub fn lnurlp_url(&self) -> String {
        format!("https://{}/.well-known/lnurlp/{}", self.domain, self.user)
    }
}

impl FromStr for LightningAddress {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for LightningAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.user, self.domain)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PayMetadata {
    callback: String,
    min_sendable: u64,
    max_sendable: u64,
    tag: Option<String>,
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CallbackResponse {
    pr: String,
    status: Option<String>,
    reason: Option<String>,
}

/// Issues invoices by paying through a Lightning address's LNURL-pay endpoint.
#[derive(Debug)]
pub struct LnurlIssuer {
    client: Client,
    address: LightningAddress,
    metadata_url: String,
}

impl LnurlIssuer {
    /// Create an issuer for a Lightning address.
    pub fn new(address: &str, timeout: Duration) -> GateResult<Self> {
        let address = LightningAddress::parse(address)?;
        Ok(Self {
            client: http_client(timeout)?,
            metadata_url: address.lnurlp_url(),
            address,
        })
    }

    /// Fetch metadata from a different URL than the address implies.
    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = url.into();
        self
    }

    /// The address invoices are requested from.
    pub fn address(&self) -> &LightningAddress {
        &self.address
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> GateResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GateError::issuance(format!(
                "LNURL endpoint returned {}: {}",
                status, body
            )));
        }
        response
            .json()
            .await
            .map_err(|e| GateError::issuance(format!("unreadable LNURL response: {}", e)))
    }
}

fn lnurl_error(status: Option<&str>, reason: Option<String>) -> Option<GateError> {
    if status.is_some_and(|s| s.eq_ignore_ascii_case(ERROR_STATUS)) {
        Some(GateError::issuance(
            reason.unwrap_or_else(|| "LNURL endpoint returned an error".to_string()),
        ))
    } else {
        None
    }
}

#[async_trait]
impl InvoiceIssuer for LnurlIssuer {
    async fn issue(&self, amount_sats: i64) -> GateResult<Invoice> {
        let amount_msat = check_amount(amount_sats)?
            .checked_mul(1000)
            .ok_or_else(|| GateError::InvalidAmount {
                amount_sats,
                reason: "amount overflows millisatoshis".to_string(),
            })?;

        debug!(address = %self.address, amount_sats, "Fetching LNURL-pay metadata");
        let metadata: PayMetadata = self.get_json(self.client.get(&self.metadata_url)).await?;
        if let Some(err) = lnurl_error(metadata.status.as_deref(), metadata.reason) {
            return Err(err);
        }
        if metadata.tag.as_deref() != Some(PAY_REQUEST_TAG) {
            return Err(GateError::issuance(format!(
                "unexpected LNURL tag {:?}",
                metadata.tag
            )));
        }
        if metadata.callback.is_empty() {
            return Err(GateError::issuance("LNURL metadata has no callback"));
        }
        if amount_msat < metadata.min_sendable || amount_msat > metadata.max_sendable {
            return Err(GateError::InvalidAmount {
                amount_sats,
                reason: format!(
                    "outside sendable range {}..={} msat",
                    metadata.min_sendable, metadata.max_sendable
                ),
            });
        }

        let callback: CallbackResponse = self
            .get_json(
                self.client
                    .get(&metadata.callback)
                    .query(&[("amount", amount_msat)]),
            )
            .await?;
        if let Some(err) = lnurl_error(callback.status.as_deref(), callback.reason) {
            return Err(err);
        }
        if callback.pr.is_empty() {
            return Err(GateError::issuance("LNURL callback returned no invoice"));
        }

        let decoded = decode_bolt11(&callback.pr)?;
        if let Some(invoiced) = decoded.amount_msat {
            if invoiced != amount_msat {
                return Err(GateError::InvalidInvoice(format!(
                    "invoice is for {} msat, requested {} msat",
                    invoiced, amount_msat
                )));
            }
        }

        Ok(Invoice {
            payment_request: callback.pr,
            payment_hash: decoded.payment_hash,
        })
    }

    fn backend(&self) -> &'static str {
        "lnurl"
    }
}
