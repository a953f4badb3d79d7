//! Inspect token command.

use lsat_macaroon::inspect_token;

use crate::error::CliResult;
use crate::output::{InspectOutput, OutputFormat, Render};

/// Execute the inspect command.
///
/// Decodes the token without any key; the result is unauthenticated.
pub fn inspect(format: OutputFormat, token: &str) -> CliResult<String> {
    let inspection = inspect_token(token.trim())?;
    let output = InspectOutput { inspection };
    Ok(output.render(format))
}
