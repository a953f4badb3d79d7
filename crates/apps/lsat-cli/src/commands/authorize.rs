//! Authorize request command.

use lsat_gate::{AccessGate, AccessOutcome, RequestContext};
use tracing::debug;

use crate::config::CliConfig;
use crate::context::build_gate;
use crate::error::CliResult;
use crate::output::{AuthorizeOutput, OutputFormat, Render};

/// Execute the authorize command.
///
/// Runs the access gate on a request described by its path and headers and
/// reports the outcome. A rejected credential is reported, not returned as
/// an error.
pub async fn authorize(
    config: &CliConfig,
    format: OutputFormat,
    path: &str,
    authorization: Option<&str>,
    accept: Option<&str>,
) -> CliResult<String> {
    let gate = build_gate(config)?;
    authorize_with_gate(&gate, format, path, authorization, accept).await
}

/// Run an already built gate on a request.
pub async fn authorize_with_gate(
    gate: &AccessGate,
    format: OutputFormat,
    path: &str,
    authorization: Option<&str>,
    accept: Option<&str>,
) -> CliResult<String> {
    let mut request = RequestContext::new(path);
    if let Some(value) = authorization {
        request = request.with_authorization(value);
    }
    if let Some(value) = accept {
        request = request.with_accept(value);
    }

    let outcome = gate.handle(&request).await;
    debug!(path, outcome = outcome.label(), "Gate decided");

    let mut output = AuthorizeOutput {
        outcome: outcome.label().to_string(),
        message: outcome.message(),
        error_code: None,
        error_kind: None,
        www_authenticate: None,
        payment_hash: None,
    };
    match &outcome {
        AccessOutcome::Free => {}
        AccessOutcome::Paid(paid) => {
            output.payment_hash = Some(paid.payment_hash.to_hex());
        }
        AccessOutcome::ChallengeIssued(challenge) => {
            output.www_authenticate = Some(challenge.www_authenticate());
            output.payment_hash = Some(challenge.payment_hash.to_hex());
        }
        AccessOutcome::Error(e) => {
            output.error_code = Some(e.error_code().to_string());
            output.error_kind = Some(e.kind());
        }
    }

    Ok(output.render(format))
}
