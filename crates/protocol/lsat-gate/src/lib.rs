//! LSAT access gate.
//!
//! Ties tokens to Lightning payments for one request at a time:
//!
//! - [`AccessGate`] - decides `Free`, `Paid`, `ChallengeIssued` or `Error`
//! - [`InvoiceIssuer`] - invoice backends ([`LndIssuer`], [`LnurlIssuer`])
//! - [`AmountPolicy`] and [`CaveatPolicy`] - pricing and per-request caveats
//! - [`GateConfig`] - serde configuration for all of the above
//!
//! The gate never picks an HTTP status. Adapters map [`AccessOutcome`] and
//! [`AccessErrorKind`] to whatever their transport needs.
//!
//! # Example
//!
//! ```ignore
//! use lsat_gate::{AccessGate, AccessOutcome, GateConfig, RequestContext};
//!
//! let gate = AccessGate::from_config(&config)?;
//! let request = RequestContext::new("/protected")
//!     .with_accept("application/vnd.lsat.v1.full+json");
//!
//! match gate.handle(&request).await {
//!     AccessOutcome::ChallengeIssued(c) => respond_402(c.www_authenticate()),
//!     AccessOutcome::Paid(_) => serve_protected(),
//!     AccessOutcome::Free => serve_free(),
//!     AccessOutcome::Error(e) => respond_error(e.kind()),
//! }
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod issuer;
pub mod policy;
pub mod types;

pub use config::{GateConfig, InvoiceBackendConfig, RAW_KEY_PREFIX};
pub use error::{AccessErrorKind, GateError, GateResult};
pub use gate::AccessGate;
pub use issuer::{
    decode_bolt11, Bolt11, Invoice, InvoiceIssuer, LightningAddress, LndIssuer, LnurlIssuer,
    DEFAULT_TIMEOUT,
};
pub use policy::{
    escape_path, AmountPolicy, CaveatPolicy, FixedPrice, NoRequestCaveats, PathCaveat,
};
pub use types::{AccessOutcome, Challenge, PaidAccess, RequestContext, ResponseBody};
