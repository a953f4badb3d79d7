//! CLI command implementations.

mod authorize;
mod challenge;
mod init;
mod inspect;
mod mint;
mod verify;

pub use authorize::{authorize, authorize_with_gate};
pub use challenge::{challenge, challenge_with_gate};
pub use init::init;
pub use inspect::inspect;
pub use mint::mint;
pub use verify::verify;
