//! Initialize configuration command.

use std::path::Path;

use lsat_crypto::generate_root_key;
use tracing::info;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{InitOutput, OutputFormat, Render};

/// Execute the init command.
///
/// Writes a default configuration holding one freshly generated root key.
pub fn init(config_path: &Path, format: OutputFormat, force: bool) -> CliResult<String> {
    if config_path.exists() && !force {
        return Err(CliError::ConfigExists(config_path.to_path_buf()));
    }

    let root_key = generate_root_key()?;

    let mut config = CliConfig::default();
    config.gate.root_keys = vec![root_key.to_hex()];
    config.save(config_path)?;

    info!(path = %config_path.display(), "Wrote configuration");

    let output = InitOutput {
        config_path: config_path.to_string_lossy().to_string(),
        root_keys: config.gate.root_keys.len(),
    };

    Ok(output.render(format))
}
