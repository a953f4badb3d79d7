//! Wire formats for LSAT.
//!
//! - [`identifier`] - fixed 66-byte identifier encoding
//! - [`macaroon`] - macaroon V2 binary envelope
//! - [`token`] - base64 token strings
//! - [`header`] - `Authorization` and `WWW-Authenticate` grammar
//!
//! Nothing in this crate verifies signatures; decoded values are untrusted.
//!
//! # Example
//!
//! ```
//! use lsat_crypto::{Hash, Preimage, Signature, TokenId};
//! use lsat_types::TokenIdentifier;
//! use lsat_wire::{encode_identifier, encode_token, format_authorization, parse_authorization, RawMacaroon};
//!
//! let id = TokenIdentifier::with_token_id(Hash::from_bytes([1; 32]), TokenId::from_bytes([2; 32]));
//! let macaroon = RawMacaroon {
//!     location: Some("LSAT".into()),
//!     identifier: encode_identifier(&id),
//!     caveats: vec![],
//!     signature: Signature::from_bytes([3; 32]),
//! };
//! let token = encode_token(&macaroon).unwrap();
//!
//! let header = format_authorization(&token, &Preimage::from_bytes([4; 32]));
//! let credential = parse_authorization(&header).unwrap();
//! assert_eq!(credential.macaroon, macaroon);
//! ```

pub mod error;
pub mod header;
pub mod identifier;
pub mod macaroon;
pub mod token;

pub use error::{DecodeError, EncodeError, HeaderError};
pub use header::{
    accepts_lsat, format_authorization, format_challenge, parse_authorization, parse_challenge,
    ChallengeHeader, Credential,
};
pub use identifier::{decode_identifier, encode_identifier};
pub use macaroon::{RawCaveat, RawMacaroon, MACAROON_V2};
pub use token::{decode_base64, decode_token, encode_token};
