//! Security Manager Protocol (SMP) LE Legacy Pairing
//!
//! This module implements the key-agreement part of LE Legacy Pairing:
//! - Selecting the association model from both sides' pairing features
//! - Producing the Temporary Key (stage 1)
//! - Exchanging confirm and random values and deriving the STK (stage 2)
//!
//! Feature exchange, encryption and key distribution belong to the
//! bonding manager driving a [`PairingSession`].

pub mod constants;
mod types;
mod pairing;
pub mod crypto;
pub mod transport;
pub mod interaction;
pub mod random;
pub mod selector;
pub mod stage1;
pub mod stage2;
mod session;

#[cfg(test)]
pub(crate) mod testing;

// Re-export public API
pub use self::types::*;
pub use self::pairing::*;
pub use self::crypto::{CommitOperands, LegacyCrypto, PairingCrypto};
pub use self::transport::{ChannelTransport, LinkError, SmpTransport};
pub use self::interaction::{NoInteraction, UiError, UserInteraction};
pub use self::random::{OsRandom, RandomSource};
pub use self::selector::select;
pub use self::stage1::{PasskeyAction, Stage1Method};
pub use self::stage2::{Stage2Engine, Stage2State};
pub use self::session::{InitialInformations, PairingSession, SessionPhase};
