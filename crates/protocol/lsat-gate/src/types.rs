//! Request and outcome types for the access gate.

use lsat_crypto::{Hash, Preimage};
use lsat_types::{
    Caveat, TokenIdentifier, FREE_CONTENT_MESSAGE, PAYMENT_REQUIRED_MESSAGE,
    PROTECTED_CONTENT_MESSAGE,
};
use lsat_wire::format_challenge;
use serde::{Deserialize, Serialize};

use crate::error::GateError;

/// The parts of an incoming request the gate looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Request path, without query string.
    pub path: String,
    /// Raw `Authorization` header value.
    pub authorization: Option<String>,
    /// Raw `Accept` header value.
    pub accept: Option<String>,
}

impl RequestContext {
    /// Create a context for a path with no headers.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set the `Authorization` header.
    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    /// Set the `Accept` header.
    pub fn with_accept(mut self, value: impl Into<String>) -> Self {
        self.accept = Some(value.into());
        self
    }
}

/// A payment challenge: an invoice plus the token that will unlock once it is paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    /// Base64 token bound to the invoice's payment hash.
    pub token: String,
    /// BOLT11 payment request.
    pub invoice: String,
    /// Payment hash of the invoice.
    pub payment_hash: Hash,
    /// Amount invoiced.
    pub amount_sats: i64,
}

impl Challenge {
    /// Value for the `WWW-Authenticate` response header.
    pub fn www_authenticate(&self) -> String {
        format_challenge(&self.token, &self.invoice)
    }
}

/// Details of a request granted through a paid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaidAccess {
    /// Preimage presented with the token.
    pub preimage: Preimage,
    /// Payment hash the token is bound to.
    pub payment_hash: Hash,
    /// Decoded token identifier.
    pub identifier: TokenIdentifier,
    /// Caveats the token carries.
    pub caveats: Vec<Caveat>,
}

/// Result of gating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    /// No credential and no opt-in: serve as free content.
    Free,
    /// Valid credential: serve protected content.
    Paid(PaidAccess),
    /// No usable credential and the client opted in: a challenge was issued.
    ChallengeIssued(Challenge),
    /// Verification or issuance failed.
    Error(GateError),
}

impl AccessOutcome {
    /// Whether the protected handler should run.
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid(_))
    }

    /// Short outcome label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Paid(_) => "paid",
            Self::ChallengeIssued(_) => "challenge",
            Self::Error(_) => "error",
        }
    }

    /// Message for a response body.
    pub fn message(&self) -> String {
        match self {
            Self::Free => FREE_CONTENT_MESSAGE.to_string(),
            Self::Paid(_) => PROTECTED_CONTENT_MESSAGE.to_string(),
            Self::ChallengeIssued(_) => PAYMENT_REQUIRED_MESSAGE.to_string(),
            Self::Error(e) => e.to_string(),
        }
    }
}

/// JSON response body `{code, message}` for adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    /// Status code chosen by the adapter.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
}

impl ResponseBody {
    /// Create a body.
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Body for an outcome with an adapter-chosen status code.
    pub fn for_outcome(outcome: &AccessOutcome, code: u16) -> Self {
        Self::new(code, outcome.message())
    }
}
