//! User interaction for passkey display and entry

use super::types::Passkey;
use crate::gap::AddressWithType;
use async_trait::async_trait;
use log::warn;
use thiserror::Error;

/// Errors reported by the user interaction surface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    #[error("User canceled operation")]
    Cancelled,

    #[error("No user interaction surface available")]
    Unavailable,

    #[error("Timed out waiting for user input")]
    Timeout,

    #[error("Passkey out of range: {0}")]
    InvalidPasskey(u32),
}

/// Surface used to show or ask the user for a passkey
#[async_trait]
pub trait UserInteraction: Send + Sync {
    /// Show the passkey the peer's user has to type. Does not wait for the user.
    fn display_passkey(&self, peer: &AddressWithType, passkey: Passkey);

    /// Ask the user for the passkey shown on the peer.
    ///
    /// Suspends until the user answers, cancels or the surface gives up.
    async fn prompt_passkey_entry(&self, peer: &AddressWithType) -> Result<u32, UiError>;
}

/// Interaction surface for devices without display or keyboard
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInteraction;

#[async_trait]
impl UserInteraction for NoInteraction {
    fn display_passkey(&self, peer: &AddressWithType, _passkey: Passkey) {
        warn!("No display available to show passkey for {}", peer);
    }

    async fn prompt_passkey_entry(&self, _peer: &AddressWithType) -> Result<u32, UiError> {
        Err(UiError::Unavailable)
    }
}
