//! Shared test fixtures for the LSAT workspace.
//!
//! - [`MockInvoiceIssuer`]: in-memory invoice backend that remembers the
//!   preimage behind every invoice it issues
//! - fixed root keys, a ready-made gate and header helpers

pub mod helpers;
pub mod mock_issuer;

pub use helpers::*;
pub use mock_issuer::MockInvoiceIssuer;
