//! LSAT CLI binary entry point.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lsat_cli::{
    cli::{Cli, Commands},
    commands,
    config::{default_config_path, CliConfig},
    error::{CliError, CliResult},
    output::OutputFormat,
};

const VERBOSE_FILTER: &str = "lsat_cli=debug,lsat_gate=debug,lsat_macaroon=debug";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging based on --verbose flag or RUST_LOG env var.
    // Logs go to stderr so command output stays parseable.
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if cli.verbose || has_rust_log {
        let filter = if cli.verbose {
            EnvFilter::new(VERBOSE_FILTER)
        } else {
            EnvFilter::from_default_env()
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    match run(cli).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            print_error(&e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Print a user-friendly error message with error code and recovery hint.
fn print_error(e: &CliError) {
    let code = e.error_code();

    eprintln!(
        "{} [{}]: {}",
        "Error".red().bold(),
        code.to_string().yellow(),
        e
    );

    if let Some(suggestion) = code.suggestion() {
        eprintln!("{}: {}", "Hint".cyan(), suggestion);
    }
}

async fn run(cli: Cli) -> CliResult<String> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let format: OutputFormat = cli.format.into();

    // Every command but init reads the configuration that init writes
    let load = || CliConfig::load(&config_path);

    let output = match cli.command {
        Commands::Init { force } => commands::init(&config_path, format, force)?,

        Commands::Mint {
            payment_hash,
            caveats,
        } => commands::mint(&load()?, format, &payment_hash, &caveats)?,

        Commands::Verify {
            token,
            preimage,
            caveats,
        } => commands::verify(&load()?, format, &token, &preimage, &caveats)?,

        Commands::Inspect { token } => commands::inspect(format, &token)?,

        Commands::Challenge { path } => commands::challenge(&load()?, format, &path).await?,

        Commands::Authorize {
            authorization,
            accept,
            path,
        } => {
            commands::authorize(
                &load()?,
                format,
                &path,
                authorization.as_deref(),
                accept.as_deref(),
            )
            .await?
        }
    };

    Ok(output)
}
