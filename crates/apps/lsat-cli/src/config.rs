//! CLI configuration.

use lsat_gate::{GateConfig, InvoiceBackendConfig, RAW_KEY_PREFIX};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{CliError, CliResult};

/// Environment variable overriding the configured root keys.
pub const ROOT_KEY_ENV: &str = "LSAT_ROOT_KEY";

/// Environment variable overriding the base directory.
pub const DATA_DIR_ENV: &str = "LSAT_DATA_DIR";

/// Expand environment variables in a string.
/// Supports `${VAR_NAME}` syntax; unknown variables are left as-is.
fn expand_env_vars(input: &str) -> String {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(re) = RE
        .get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").ok())
        .as_ref()
    else {
        return input.to_string();
    };
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .to_string()
}

/// CLI configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Access gate configuration.
    pub gate: GateConfig,
}

impl CliConfig {
    /// Load configuration from a file.
    ///
    /// A missing file yields the default configuration. `${VAR}` references
    /// in keys and backend secrets are expanded, then `LSAT_ROOT_KEY`
    /// replaces the key list if set.
    pub fn load(path: &Path) -> CliResult<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            Self::default()
        };
        config.expand_env();
        config.apply_root_key_override(std::env::var(ROOT_KEY_ENV).ok().as_deref());
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn expand_env(&mut self) {
        for key in &mut self.gate.root_keys {
            *key = expand_env_vars(key);
        }
        match &mut self.gate.backend {
            Some(InvoiceBackendConfig::Lnd {
                rest_url,
                macaroon_hex,
                ..
            }) => {
                *rest_url = expand_env_vars(rest_url);
                *macaroon_hex = expand_env_vars(macaroon_hex);
            }
            Some(InvoiceBackendConfig::Lnurl { address, .. }) => {
                *address = expand_env_vars(address);
            }
            None => {}
        }
    }

    /// Replace the root keys with a comma-separated list of hex keys, if one
    /// is given. A value starting with `raw:` is a single key taken verbatim.
    pub fn apply_root_key_override(&mut self, value: Option<&str>) {
        let Some(value) = value else {
            return;
        };
        if value.starts_with(RAW_KEY_PREFIX) {
            if value.len() > RAW_KEY_PREFIX.len() {
                self.gate.root_keys = vec![value.to_string()];
            }
            return;
        }
        let keys: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect();
        if !keys.is_empty() {
            self.gate.root_keys = keys;
        }
    }
}

/// Get the default base directory for lsat data.
///
/// `LSAT_DATA_DIR` if set, otherwise `~/.lsat`.
pub fn default_base_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".lsat"))
        .unwrap_or_else(|| PathBuf::from(".lsat"))
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    default_base_dir().join("config.toml")
}
