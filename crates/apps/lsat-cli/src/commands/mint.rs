//! Mint token command.

use lsat_macaroon::Minter;
use tracing::debug;

use crate::config::CliConfig;
use crate::context::{caveats_with_static, parse_payment_hash, root_keys};
use crate::error::{CliError, CliResult};
use crate::output::{MintOutput, OutputFormat, Render};

/// Execute the mint command.
///
/// Signs with the first configured root key. Configured static caveats come
/// before the ones given on the command line.
pub fn mint(
    config: &CliConfig,
    format: OutputFormat,
    payment_hash: &str,
    caveats: &[String],
) -> CliResult<String> {
    let payment_hash = parse_payment_hash(payment_hash)?;
    let caveats = caveats_with_static(config, caveats)?;

    let root_key = root_keys(config)?
        .into_iter()
        .next()
        .ok_or_else(|| CliError::config("no root key configured"))?;

    let minted = Minter::new(root_key).mint(payment_hash, &caveats)?;
    debug!(
        payment_hash = %payment_hash,
        caveats = caveats.len(),
        "Minted token"
    );

    let output = MintOutput {
        token: minted.token,
        payment_hash: payment_hash.to_hex(),
        token_id: minted.identifier.token_id.to_hex(),
        caveats,
    };

    Ok(output.render(format))
}
