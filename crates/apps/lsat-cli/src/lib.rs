//! Command-line interface for LSAT tokens.
//!
//! This crate provides the `lsat` binary for operators of a payment-gated
//! service. It includes commands for:
//!
//! - **Setup**: generate a configuration with a fresh root key
//! - **Tokens**: mint, verify and inspect tokens
//! - **Gate**: issue a challenge or run the access gate on a request
//!
//! # Quick Start
//!
//! ```bash
//! # Create ~/.lsat/config.toml with a new root key
//! lsat init
//!
//! # Mint a token for a payment hash
//! lsat mint --payment-hash <hex> --caveat RequestPath=/protected
//!
//! # Check a token and preimage
//! lsat verify --token <base64> --preimage <hex> --caveat RequestPath=/protected
//! ```
//!
//! # Output Formats
//!
//! All commands support `--format` for output control:
//!
//! - `human` (default): Human-readable with colors
//! - `json`: Machine-readable JSON
//!
//! # Configuration
//!
//! Configuration is loaded from `~/.lsat/config.toml`. Override with `--config`.
//! `LSAT_ROOT_KEY` (comma-separated hex keys, or one `raw:` text key) overrides
//! the configured keys.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod output;

// Re-export main types
pub use cli::{Cli, Commands, OutputFormatArg};
pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Render};
