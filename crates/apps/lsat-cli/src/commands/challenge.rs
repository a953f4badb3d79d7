//! Issue challenge command.

use lsat_gate::{AccessGate, AccessOutcome, RequestContext};

use crate::config::CliConfig;
use crate::context::build_gate;
use crate::error::{CliError, CliResult};
use crate::output::{ChallengeOutput, OutputFormat, Render};

/// Execute the challenge command.
///
/// Issues an invoice through the configured backend and mints a token bound
/// to it for `path`.
pub async fn challenge(config: &CliConfig, format: OutputFormat, path: &str) -> CliResult<String> {
    let gate = build_gate(config)?;
    challenge_with_gate(&gate, &config.gate.accept_marker, format, path).await
}

/// Issue a challenge through an already built gate.
pub async fn challenge_with_gate(
    gate: &AccessGate,
    accept_marker: &str,
    format: OutputFormat,
    path: &str,
) -> CliResult<String> {
    let request = RequestContext::new(path).with_accept(accept_marker);

    match gate.handle(&request).await {
        AccessOutcome::ChallengeIssued(challenge) => {
            let output = ChallengeOutput {
                www_authenticate: challenge.www_authenticate(),
                token: challenge.token,
                invoice: challenge.invoice,
                payment_hash: challenge.payment_hash.to_hex(),
                amount_sats: challenge.amount_sats,
            };
            Ok(output.render(format))
        }
        AccessOutcome::Error(e) => Err(e.into()),
        other => Err(CliError::user(format!(
            "gate did not issue a challenge (outcome: {})",
            other.label()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsat_test_utils::test_gate;
    use lsat_types::ACCEPT_MARKER;
    use lsat_wire::parse_challenge;

    #[tokio::test]
    async fn test_challenge_issues_invoice() {
        let (gate, issuer) = test_gate();
        let output = challenge_with_gate(&gate, ACCEPT_MARKER, OutputFormat::Json, "/paid")
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        let header = json["www_authenticate"].as_str().unwrap();
        let parsed = parse_challenge(header).unwrap();
        assert_eq!(parsed.macaroon, json["token"].as_str().unwrap());
        assert_eq!(parsed.invoice, json["invoice"].as_str().unwrap());
        assert_eq!(issuer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_challenge_issuer_failure() {
        let (gate, issuer) = test_gate();
        issuer.set_should_fail(true);

        let err = challenge_with_gate(&gate, ACCEPT_MARKER, OutputFormat::Human, "/paid")
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn test_challenge_without_backend() {
        let mut config = CliConfig::default();
        config.gate.root_keys = vec!["0011".into()];

        let err = challenge(&config, OutputFormat::Human, "/")
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
