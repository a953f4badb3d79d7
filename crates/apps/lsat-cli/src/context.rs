//! Building protocol objects from the CLI configuration.

use std::sync::Arc;

use async_trait::async_trait;
use lsat_crypto::{Hash, Preimage, RootKey};
use lsat_gate::{AccessGate, GateError, GateResult, Invoice, InvoiceIssuer};
use lsat_types::Caveat;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Stands in for a backend when none is configured.
///
/// Verification still works; any attempt to issue a challenge fails.
struct UnconfiguredIssuer;

#[async_trait]
impl InvoiceIssuer for UnconfiguredIssuer {
    async fn issue(&self, _amount_sats: i64) -> GateResult<Invoice> {
        Err(GateError::Config(
            "no invoice backend configured; add a [gate.backend] section".to_string(),
        ))
    }

    fn backend(&self) -> &'static str {
        "none"
    }
}

/// Root keys from the configuration, first one mints.
pub fn root_keys(config: &CliConfig) -> CliResult<Vec<RootKey>> {
    Ok(config.gate.root_keys()?)
}

/// Static caveats from the configuration followed by the given arguments.
pub fn caveats_with_static(config: &CliConfig, args: &[String]) -> CliResult<Vec<Caveat>> {
    let mut caveats = config.gate.static_caveats()?;
    for raw in args {
        caveats.push(parse_caveat(raw)?);
    }
    Ok(caveats)
}

/// Parse a `condition=value` argument.
pub fn parse_caveat(raw: &str) -> CliResult<Caveat> {
    Caveat::decode(raw).map_err(|_| CliError::InvalidCaveat(raw.to_string()))
}

/// Parse a hex payment hash argument.
pub fn parse_payment_hash(hex: &str) -> CliResult<Hash> {
    Hash::from_hex(hex).map_err(|e| CliError::InvalidHex {
        field: "payment hash",
        reason: e.to_string(),
    })
}

/// Parse a hex preimage argument.
pub fn parse_preimage(hex: &str) -> CliResult<Preimage> {
    Preimage::from_hex(hex).map_err(|e| CliError::InvalidHex {
        field: "preimage",
        reason: e.to_string(),
    })
}

/// Build the access gate, with the configured backend if there is one.
pub fn build_gate(config: &CliConfig) -> CliResult<AccessGate> {
    let gate = if config.gate.backend.is_some() {
        AccessGate::from_config(&config.gate)?
    } else {
        AccessGate::from_config_with_issuer(&config.gate, Arc::new(UnconfiguredIssuer))?
    };
    Ok(gate)
}
