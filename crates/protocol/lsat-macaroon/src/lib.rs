//! Minting, verification and inspection of LSAT macaroons.
//!
//! A token is a macaroon whose identifier binds it to a Lightning payment
//! hash. Minting signs the identifier and caveats with a root key; verifying
//! recomputes the chain, checks the required caveats and checks that the
//! presented preimage hashes to the bound payment hash.
//!
//! # Example
//!
//! ```
//! use lsat_crypto::{payment_hash, Preimage, RootKey};
//! use lsat_macaroon::{Minter, Verifier};
//! use lsat_types::{Caveat, RequiredCaveats};
//!
//! let root_key = RootKey::from_bytes(b"ABDEGHKLMPTC".to_vec()).unwrap();
//! let preimage = Preimage::from_bytes([42; 32]);
//! let caveats = [Caveat::new("RequestPath", "/protected")];
//!
//! let minted = Minter::new(root_key.clone())
//!     .mint(payment_hash(&preimage), &caveats)
//!     .unwrap();
//!
//! let required = RequiredCaveats::from(&caveats[..]);
//! let verified = Verifier::new(root_key)
//!     .verify(&minted.token, &required, &preimage)
//!     .unwrap();
//! assert_eq!(verified.identifier, minted.identifier);
//! ```

mod chain;
mod error;
mod inspect;
mod mint;
mod verify;

pub use chain::signature_chain;
pub use error::{TokenError, TokenResult};
pub use inspect::{inspect_token, InspectedCaveat, TokenInspection};
pub use mint::{mint, MintedToken, Minter};
pub use verify::{verify, VerifiedToken, Verifier};
