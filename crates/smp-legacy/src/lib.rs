//! smp-legacy - LE Legacy Pairing for the Bluetooth Security Manager Protocol
//!
//! This library implements the key-agreement half of LE Legacy Pairing:
//! choosing an association model from the exchanged pairing features,
//! producing the Temporary Key (Just Works, Passkey Entry or Out of Band),
//! and running the confirm/random exchange that yields the Short Term Key.
//!
//! The transport, the user interaction surface and the random source are
//! supplied by the caller through the traits in [`smp`].

pub mod gap;
pub mod smp;

// Re-export common types for convenience
pub use gap::{AddressType, AddressWithType, BdAddr};
pub use smp::{
    AssociationModel, AuthRequirements, InitialInformations, IoCapability, OobDataFlag,
    PairingFailure, PairingRequest, PairingResponse, PairingSession, Role, ShortTermKey,
    TemporaryKey,
};
