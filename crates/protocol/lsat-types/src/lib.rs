//! Data types for LSAT tokens.
//!
//! This crate holds the value types shared by the token engine and the access
//! gate. It contains no I/O and no cryptographic state.
//!
//! # Module Organization
//!
//! - [`caveat`] - `Caveat`, `RequiredCaveats` and the caveat check
//! - [`identifier`] - the identifier embedded in each token
//! - [`constants`] - protocol constants (scheme, markers, limits)
//! - [`error`] - error codes and caveat errors
//!
//! # Example
//!
//! ```
//! use lsat_types::{verify_presented, Caveat, RequiredCaveats, REQUEST_PATH_CAVEAT};
//!
//! let required: RequiredCaveats =
//!     [Caveat::new(REQUEST_PATH_CAVEAT, "/protected")].into_iter().collect();
//! let presented = ["RequestPath=/protected"];
//! assert!(verify_presented(&presented, &required).is_ok());
//! ```

pub mod caveat;
pub mod constants;
pub mod error;
pub mod identifier;

pub use caveat::{verify_presented, Caveat, RequiredCaveats, CAVEAT_DELIMITER};
pub use constants::*;
pub use error::{CaveatError, ErrorCode};
pub use identifier::TokenIdentifier;
