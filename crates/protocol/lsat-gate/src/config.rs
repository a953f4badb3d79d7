//! Gate configuration.
//!
//! Deserializes from TOML or JSON with snake_case keys. Every field has a
//! default, so an empty document is a valid (if keyless) configuration.

use std::sync::Arc;
use std::time::Duration;

use lsat_crypto::RootKey;
use lsat_types::{Caveat, ACCEPT_MARKER, DEFAULT_INVOICE_MEMO, DEFAULT_PRICE_SATS};
use serde::{Deserialize, Serialize};

use crate::error::{GateError, GateResult};
use crate::issuer::{InvoiceIssuer, LndIssuer, LnurlIssuer};

fn default_accept_marker() -> String {
    ACCEPT_MARKER.to_string()
}

fn default_path_caveat() -> bool {
    true
}

fn default_price_sats() -> i64 {
    DEFAULT_PRICE_SATS
}

fn default_invoice_memo() -> String {
    DEFAULT_INVOICE_MEMO.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Access gate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Root keys. The first mints; all of them verify.
    ///
    /// Each entry is hex, or `raw:` followed by the key bytes as text (the
    /// form deployments that read the key straight from the environment use).
    #[serde(default)]
    pub root_keys: Vec<String>,

    /// Static caveats, `condition=value`, added to every token and required
    /// on every request.
    #[serde(default)]
    pub caveats: Vec<String>,

    /// Accept header marker that opts a client into challenges.
    #[serde(default = "default_accept_marker")]
    pub accept_marker: String,

    /// Bind tokens to the request path.
    #[serde(default = "default_path_caveat")]
    pub path_caveat: bool,

    /// Price of every request in satoshis.
    #[serde(default = "default_price_sats")]
    pub price_sats: i64,

    /// Memo for invoices the gate creates.
    #[serde(default = "default_invoice_memo")]
    pub invoice_memo: String,

    /// Invoice backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<InvoiceBackendConfig>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            root_keys: Vec::new(),
            caveats: Vec::new(),
            accept_marker: default_accept_marker(),
            path_caveat: default_path_caveat(),
            price_sats: default_price_sats(),
            invoice_memo: default_invoice_memo(),
            backend: None,
        }
    }
}

impl GateConfig {
    /// Parse the configured root keys. Fails if there are none.
    pub fn root_keys(&self) -> GateResult<Vec<RootKey>> {
        if self.root_keys.is_empty() {
            return Err(GateError::Config("no root key configured".to_string()));
        }
        self.root_keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                parse_root_key(key)
                    .map_err(|e| GateError::Config(format!("root_keys[{}]: {}", i, e)))
            })
            .collect()
    }

    /// Parse the static caveats. Each must be mintable.
    pub fn static_caveats(&self) -> GateResult<Vec<Caveat>> {
        self.caveats
            .iter()
            .map(|raw| {
                let caveat = Caveat::decode(raw)
                    .map_err(|e| GateError::Config(format!("caveats: {}", e)))?;
                if !caveat.is_well_formed() {
                    return Err(GateError::Config(format!(
                        "caveats: {:?} needs a non-empty condition",
                        raw
                    )));
                }
                Ok(caveat)
            })
            .collect()
    }

    /// Build the configured invoice backend.
    pub fn issuer(&self) -> GateResult<Arc<dyn InvoiceIssuer>> {
        self.backend
            .as_ref()
            .ok_or_else(|| GateError::Config("no invoice backend configured".to_string()))?
            .build(&self.invoice_memo)
    }
}

/// Prefix marking a root key given as raw text instead of hex.
pub const RAW_KEY_PREFIX: &str = "raw:";

fn parse_root_key(key: &str) -> Result<RootKey, lsat_crypto::CryptoError> {
    match key.strip_prefix(RAW_KEY_PREFIX) {
        Some(raw) => RootKey::from_bytes(raw.as_bytes().to_vec()),
        None => RootKey::from_hex(key),
    }
}

/// Which backend creates invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvoiceBackendConfig {
    /// LND REST API.
    Lnd {
        /// Node REST endpoint, e.g. `https://localhost:8080`
        rest_url: String,
        /// Invoice macaroon, hex encoded
        macaroon_hex: String,
        /// Request timeout
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    /// LNURL-pay through a Lightning address.
    Lnurl {
        /// `user@domain`
        address: String,
        /// Request timeout
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl InvoiceBackendConfig {
    /// Create the issuer this configuration describes.
    pub fn build(&self, memo: &str) -> GateResult<Arc<dyn InvoiceIssuer>> {
        match self {
            Self::Lnd {
                rest_url,
                macaroon_hex,
                timeout_secs,
            } => Ok(Arc::new(LndIssuer::new(
                rest_url.as_str(),
                macaroon_hex.as_str(),
                memo,
                Duration::from_secs(*timeout_secs),
            )?)),
            Self::Lnurl {
                address,
                timeout_secs,
            } => Ok(Arc::new(LnurlIssuer::new(
                address,
                Duration::from_secs(*timeout_secs),
            )?)),
        }
    }

    /// Backend name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lnd { .. } => "lnd",
            Self::Lnurl { .. } => "lnurl",
        }
    }
}
