//! Output formatting for CLI.

use colored::Colorize;
use lsat_macaroon::TokenInspection;
use lsat_types::Caveat;
use serde::Serialize;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use 'human' or 'json'.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Trait for renderable output.
pub trait Render {
    /// Render as human-readable string.
    fn render_human(&self) -> String;

    /// Render as JSON string.
    fn render_json(&self) -> String;

    /// Render in the specified format.
    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.render_human(),
            OutputFormat::Json => self.render_json(),
        }
    }
}

fn caveat_list(caveats: &[Caveat]) -> String {
    if caveats.is_empty() {
        "(none)".to_string()
    } else {
        caveats
            .iter()
            .map(Caveat::encode)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// =============================================================================
// Output Types
// =============================================================================

/// Output for config initialization.
#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub config_path: String,
    pub root_keys: usize,
}

impl Render for InitOutput {
    fn render_human(&self) -> String {
        format!(
            "{}\n{} {}",
            "Root key generated.".green().bold(),
            "Configuration saved to:".green(),
            self.config_path
        )
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for mint command.
#[derive(Debug, Serialize)]
pub struct MintOutput {
    pub token: String,
    pub payment_hash: String,
    pub token_id: String,
    pub caveats: Vec<Caveat>,
}

impl Render for MintOutput {
    fn render_human(&self) -> String {
        [
            format!("{} {}", "Token:".bold(), self.token),
            format!("{} {}", "Payment Hash:".bold(), self.payment_hash),
            format!("{} {}", "Token ID:".bold(), self.token_id),
            format!("{} {}", "Caveats:".bold(), caveat_list(&self.caveats)),
        ]
        .join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for verify command.
#[derive(Debug, Serialize)]
pub struct VerifyOutput {
    pub valid: bool,
    pub payment_hash: String,
    pub token_id: String,
    pub key_index: usize,
    pub caveats: Vec<Caveat>,
}

impl Render for VerifyOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![
            format!("{}", "Token is valid.".green().bold()),
            format!("{} {}", "Payment Hash:".bold(), self.payment_hash),
            format!("{} {}", "Token ID:".bold(), self.token_id),
            format!("{} {}", "Caveats:".bold(), caveat_list(&self.caveats)),
        ];
        if self.key_index > 0 {
            lines.push(format!(
                "{} signed by rotated key #{}",
                "Note:".yellow(),
                self.key_index
            ));
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for inspect command.
#[derive(Debug, Serialize)]
pub struct InspectOutput {
    #[serde(flatten)]
    pub inspection: TokenInspection,
}

impl Render for InspectOutput {
    fn render_human(&self) -> String {
        let i = &self.inspection;
        let mut lines = vec![format!(
            "{}",
            "Unverified: the signature has not been checked.".yellow()
        )];
        lines.push(format!(
            "{} {}",
            "Location:".bold(),
            i.location.as_deref().unwrap_or("(none)")
        ));
        match (&i.identifier, &i.identifier_error) {
            (Some(id), _) => {
                lines.push(format!("{} {}", "Version:".bold(), id.version));
                lines.push(format!("{} {}", "Payment Hash:".bold(), id.payment_hash));
                lines.push(format!("{} {}", "Token ID:".bold(), id.token_id));
            }
            (None, Some(err)) => lines.push(format!(
                "{} {} bytes, not an LSAT identifier ({})",
                "Identifier:".bold(),
                i.identifier_len,
                err
            )),
            (None, None) => {}
        }
        lines.push(format!("{} {}", "Caveats:".bold(), i.caveats.len()));
        for caveat in &i.caveats {
            let marker = if caveat.third_party {
                " (third-party)"
            } else {
                ""
            };
            lines.push(format!("  {}{}", caveat.raw, marker));
        }
        lines.push(format!("{} {}", "Signature:".bold(), i.signature));
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for challenge command.
#[derive(Debug, Serialize)]
pub struct ChallengeOutput {
    pub www_authenticate: String,
    pub token: String,
    pub invoice: String,
    pub payment_hash: String,
    pub amount_sats: i64,
}

impl Render for ChallengeOutput {
    fn render_human(&self) -> String {
        [
            format!("{} {} sats", "Payment Required:".yellow().bold(), self.amount_sats),
            format!("{} {}", "WWW-Authenticate:".bold(), self.www_authenticate),
            format!("{} {}", "Payment Hash:".bold(), self.payment_hash),
        ]
        .join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for authorize command.
#[derive(Debug, Serialize)]
pub struct AuthorizeOutput {
    pub outcome: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<lsat_gate::AccessErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub www_authenticate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_hash: Option<String>,
}

impl Render for AuthorizeOutput {
    fn render_human(&self) -> String {
        let outcome = match self.outcome.as_str() {
            "paid" => self.outcome.green().bold(),
            "free" => self.outcome.normal().bold(),
            "challenge" => self.outcome.yellow().bold(),
            _ => self.outcome.red().bold(),
        };
        let mut lines = vec![format!("{} {}: {}", "Outcome:".bold(), outcome, self.message)];
        if let Some(code) = &self.error_code {
            lines.push(format!("{} {}", "Code:".bold(), code));
        }
        if let Some(header) = &self.www_authenticate {
            lines.push(format!("{} {}", "WWW-Authenticate:".bold(), header));
        }
        if let Some(hash) = &self.payment_hash {
            lines.push(format!("{} {}", "Payment Hash:".bold(), hash));
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
