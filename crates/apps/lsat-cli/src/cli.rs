//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// LSAT token CLI.
#[derive(Parser, Debug)]
#[command(name = "lsat")]
#[command(version)]
#[command(about = "Mint, verify and gate LSAT tokens")]
#[command(
    long_about = "LSAT ties a macaroon to a Lightning invoice: pay the invoice, present the preimage, get access.\n\nRun 'lsat init' to get started."
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (human or json).
    #[arg(short, long, global = true, default_value = "human")]
    pub format: OutputFormatArg,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Output format argument for clap.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormatArg {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // =========================================================================
    // Setup
    // =========================================================================
    /// Write a default configuration with a fresh root key.
    Init {
        /// Overwrite an existing configuration.
        #[arg(long)]
        force: bool,
    },

    // =========================================================================
    // Token Commands
    // =========================================================================
    /// Mint a token bound to a payment hash.
    ///
    /// Uses the first configured root key. Static caveats from the
    /// configuration are added before the ones given here.
    Mint {
        /// Payment hash of the invoice, 64 hex characters.
        #[arg(long)]
        payment_hash: String,

        /// Caveat to add, as condition=value. Repeatable.
        #[arg(long = "caveat", value_name = "CONDITION=VALUE")]
        caveats: Vec<String>,
    },

    /// Verify a token and preimage.
    ///
    /// Tries every configured root key. Static caveats from the configuration
    /// are required in addition to the ones given here.
    Verify {
        /// Base64 token.
        #[arg(long)]
        token: String,

        /// Payment preimage, 64 hex characters.
        #[arg(long)]
        preimage: String,

        /// Required caveat, as condition=value. Repeatable.
        #[arg(long = "caveat", value_name = "CONDITION=VALUE")]
        caveats: Vec<String>,
    },

    /// Decode a token without verifying it.
    Inspect {
        /// Base64 token.
        token: String,
    },

    // =========================================================================
    // Gate Commands
    // =========================================================================
    /// Issue an invoice and print the payment challenge.
    Challenge {
        /// Request path the token is bound to.
        #[arg(short, long, default_value = "/")]
        path: String,
    },

    /// Run the access gate once and print the outcome.
    Authorize {
        /// Authorization header value.
        #[arg(short, long)]
        authorization: Option<String>,

        /// Accept header value.
        #[arg(long)]
        accept: Option<String>,

        /// Request path.
        #[arg(short, long, default_value = "/")]
        path: String,
    },
}
