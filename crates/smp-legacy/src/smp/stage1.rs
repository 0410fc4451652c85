//! Legacy pairing phase 2, stage 1: Temporary Key generation
//!
//! Each association model produces the TK differently. Just Works uses an
//! all-zero key, Passkey Entry a six digit value one user relays to the
//! other device, and Out of Band a value exchanged through a side channel.

use super::constants::*;
use super::interaction::{UiError, UserInteraction};
use super::random::RandomSource;
use super::types::*;
use crate::gap::AddressWithType;
use byteorder::{ByteOrder, LittleEndian};
use log::debug;

/// What the local user does during Passkey Entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasskeyAction {
    /// Generate a passkey and show it
    Display,
    /// Ask the user for the passkey shown on the peer
    Enter,
}

/// Stage 1 method with the data it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage1Method {
    JustWorks,
    PasskeyEntry { action: PasskeyAction },
    OutOfBand { tk: TemporaryKey },
}

impl Stage1Method {
    /// Prepare the stage 1 method for the selected association model
    pub fn plan(
        model: AssociationModel,
        role: Role,
        local_io: IoCapability,
        remote_io: IoCapability,
        oob_data: Option<&TemporaryKey>,
    ) -> PairingResult<Self> {
        match model {
            AssociationModel::JustWorks => Ok(Stage1Method::JustWorks),
            AssociationModel::PasskeyEntry => Ok(Stage1Method::PasskeyEntry {
                action: passkey_action(role, local_io, remote_io),
            }),
            AssociationModel::OutOfBand => oob_data
                .map(|tk| Stage1Method::OutOfBand { tk: out_of_band(tk) })
                .ok_or(PairingFailure::OobNotAvailable),
        }
    }

    /// Produce the Temporary Key
    pub async fn temporary_key(
        &self,
        peer: &AddressWithType,
        rng: &dyn RandomSource,
        ui: &dyn UserInteraction,
    ) -> PairingResult<TemporaryKey> {
        match self {
            Stage1Method::JustWorks => Ok(just_works()),
            Stage1Method::PasskeyEntry { action } => {
                run_passkey_action(*action, peer, rng, ui).await
            }
            Stage1Method::OutOfBand { tk } => Ok(tk.clone()),
        }
    }
}

/// Just Works: TK is zero
pub fn just_works() -> TemporaryKey {
    TemporaryKey::zero()
}

/// Out of Band: TK is the value received through the side channel
pub fn out_of_band(oob_data: &TemporaryKey) -> TemporaryKey {
    oob_data.clone()
}

/// Decide whether the local device displays or enters the passkey
/// (Bluetooth Core Vol 3, Part H, 2.3.5.1, Table 2.8).
pub fn passkey_action(role: Role, local_io: IoCapability, remote_io: IoCapability) -> PasskeyAction {
    match (local_io, remote_io) {
        (IoCapability::DisplayOnly | IoCapability::DisplayYesNo, _) => PasskeyAction::Display,
        (IoCapability::KeyboardDisplay, IoCapability::KeyboardDisplay) => {
            if role == Role::Initiator {
                PasskeyAction::Display
            } else {
                PasskeyAction::Enter
            }
        }
        (IoCapability::KeyboardDisplay, IoCapability::KeyboardOnly) => PasskeyAction::Display,
        _ => PasskeyAction::Enter,
    }
}

/// Passkey Entry for the local device
pub async fn passkey_entry(
    role: Role,
    local_io: IoCapability,
    remote_io: IoCapability,
    peer: &AddressWithType,
    rng: &dyn RandomSource,
    ui: &dyn UserInteraction,
) -> PairingResult<TemporaryKey> {
    run_passkey_action(passkey_action(role, local_io, remote_io), peer, rng, ui).await
}

async fn run_passkey_action(
    action: PasskeyAction,
    peer: &AddressWithType,
    rng: &dyn RandomSource,
    ui: &dyn UserInteraction,
) -> PairingResult<TemporaryKey> {
    let passkey = match action {
        PasskeyAction::Display => {
            debug!("Passkey entry with {}: displaying passkey", peer);
            let passkey = generate_passkey(rng)?;
            ui.display_passkey(peer, passkey);
            passkey
        }
        PasskeyAction::Enter => {
            debug!("Passkey entry with {}: waiting for user input", peer);
            let value = ui.prompt_passkey_entry(peer).await?;
            Passkey::new(value).ok_or(UiError::InvalidPasskey(value))?
        }
    };

    Ok(passkey_to_tk(passkey))
}

/// Draw a passkey from 20 random bits.
///
/// Draws above 999999 are halved once rather than redrawn, matching the
/// values legacy peers produce.
pub fn generate_passkey(rng: &dyn RandomSource) -> PairingResult<Passkey> {
    let mut random = [0u8; 16];
    rng.fill(&mut random);

    let mut value = LittleEndian::read_u32(&random[0..4]) & SMP_PASSKEY_RANDOM_MASK;
    if value > SMP_PASSKEY_MAX {
        value >>= 1;
    }

    Passkey::new(value)
        .ok_or_else(|| PairingFailure::UnreachableState(format!("passkey {} out of range", value)))
}

/// TK holds the passkey in its first four octets, least significant first
pub fn passkey_to_tk(passkey: Passkey) -> TemporaryKey {
    let mut tk = [0u8; SMP_KEY_SIZE];
    LittleEndian::write_u32(&mut tk[0..4], passkey.value());
    TemporaryKey::new(tk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gap::BdAddr;
    use crate::smp::testing::{FixedRandom, ScriptedUi};

    fn peer() -> AddressWithType {
        AddressWithType::public(BdAddr::new([1, 2, 3, 4, 5, 6]))
    }

    #[test]
    fn test_just_works_is_zero() {
        assert_eq!(just_works().as_bytes(), &[0u8; 16]);
    }

    #[test]
    fn test_out_of_band_is_verbatim() {
        let oob = TemporaryKey::new([0x42; 16]);
        assert_eq!(out_of_band(&oob), oob);
    }

    #[test]
    fn test_passkey_action_table() {
        use IoCapability::*;
        use PasskeyAction::*;

        assert_eq!(passkey_action(Role::Initiator, DisplayOnly, KeyboardOnly), Display);
        assert_eq!(passkey_action(Role::Responder, KeyboardOnly, DisplayYesNo), Enter);
        assert_eq!(passkey_action(Role::Responder, DisplayYesNo, KeyboardDisplay), Display);
        assert_eq!(passkey_action(Role::Initiator, KeyboardDisplay, DisplayOnly), Enter);

        // Both KeyboardDisplay: the initiator displays
        assert_eq!(passkey_action(Role::Initiator, KeyboardDisplay, KeyboardDisplay), Display);
        assert_eq!(passkey_action(Role::Responder, KeyboardDisplay, KeyboardDisplay), Enter);

        // KeyboardDisplay against KeyboardOnly: the KeyboardDisplay side displays
        assert_eq!(passkey_action(Role::Responder, KeyboardDisplay, KeyboardOnly), Display);
        assert_eq!(passkey_action(Role::Initiator, KeyboardOnly, KeyboardDisplay), Enter);

        // Both keyboards: both users type the same passkey
        assert_eq!(passkey_action(Role::Initiator, KeyboardOnly, KeyboardOnly), Enter);
        assert_eq!(passkey_action(Role::Responder, KeyboardOnly, KeyboardOnly), Enter);
    }

    #[test]
    fn test_passkey_actions_complement_each_other() {
        use IoCapability::*;

        let pairs = [
            (DisplayOnly, KeyboardOnly),
            (DisplayYesNo, KeyboardDisplay),
            (KeyboardDisplay, KeyboardDisplay),
            (KeyboardDisplay, KeyboardOnly),
        ];

        for (initiator_io, responder_io) in pairs {
            let initiator = passkey_action(Role::Initiator, initiator_io, responder_io);
            let responder = passkey_action(Role::Responder, responder_io, initiator_io);
            assert_ne!(initiator, responder, "{} / {}", initiator_io, responder_io);
        }
    }

    #[test]
    fn test_generate_passkey_range() {
        let draws: [u32; 6] = [0, 999_999, 1_000_000, 0x000F_FFFF, 0xFFFF_FFFF, 0x1234_5678];
        let rng = FixedRandom::new(draws.iter().map(|draw| {
            let mut value = [0u8; 16];
            value[0..4].copy_from_slice(&draw.to_le_bytes());
            value
        }));

        let passkeys: Vec<u32> = draws
            .iter()
            .map(|_| generate_passkey(&rng).unwrap().value())
            .collect();

        assert_eq!(passkeys[0], 0);
        assert_eq!(passkeys[1], 999_999);
        assert_eq!(passkeys[2], 500_000);
        assert_eq!(passkeys[3], 0x000F_FFFF >> 1);
        assert_eq!(passkeys[4], 0x000F_FFFF >> 1);
        assert_eq!(passkeys[5], 0x0004_5678);
        assert!(passkeys.iter().all(|p| *p <= SMP_PASSKEY_MAX));
    }

    #[test]
    fn test_passkey_to_tk() {
        let tk = passkey_to_tk(Passkey::new(123_456).unwrap());
        assert_eq!(LittleEndian::read_u32(&tk.as_bytes()[0..4]), 123_456);
        assert_eq!(&tk.as_bytes()[0..4], &[0x40, 0xE2, 0x01, 0x00]);
        assert_eq!(&tk.as_bytes()[4..], &[0u8; 12]);
    }

    #[tokio::test]
    async fn test_passkey_entry_display_side() {
        let mut draw = [0u8; 16];
        draw[0..4].copy_from_slice(&123_456u32.to_le_bytes());
        let rng = FixedRandom::new([draw]);
        let ui = ScriptedUi::answering(Err(UiError::Unavailable));

        let tk = passkey_entry(
            Role::Responder,
            IoCapability::DisplayOnly,
            IoCapability::KeyboardOnly,
            &peer(),
            &rng,
            &ui,
        )
        .await
        .unwrap();

        assert_eq!(ui.displayed(), vec![123_456]);
        assert_eq!(ui.prompt_count(), 0);
        assert_eq!(tk, passkey_to_tk(Passkey::new(123_456).unwrap()));
    }

    #[tokio::test]
    async fn test_passkey_entry_input_side() {
        let rng = FixedRandom::empty();
        let ui = ScriptedUi::answering(Ok(654_321));

        let tk = passkey_entry(
            Role::Initiator,
            IoCapability::KeyboardOnly,
            IoCapability::DisplayOnly,
            &peer(),
            &rng,
            &ui,
        )
        .await
        .unwrap();

        assert!(ui.displayed().is_empty());
        assert_eq!(ui.prompt_count(), 1);
        assert_eq!(LittleEndian::read_u32(&tk.as_bytes()[0..4]), 654_321);
    }

    #[tokio::test]
    async fn test_passkey_entry_failures() {
        let rng = FixedRandom::empty();

        let cancelled = ScriptedUi::answering(Err(UiError::Cancelled));
        let result = passkey_entry(
            Role::Initiator,
            IoCapability::KeyboardOnly,
            IoCapability::DisplayOnly,
            &peer(),
            &rng,
            &cancelled,
        )
        .await;
        assert_eq!(result, Err(PairingFailure::Ui(UiError::Cancelled)));

        let too_large = ScriptedUi::answering(Ok(1_000_000));
        let result = passkey_entry(
            Role::Initiator,
            IoCapability::KeyboardOnly,
            IoCapability::DisplayOnly,
            &peer(),
            &rng,
            &too_large,
        )
        .await;
        assert_eq!(
            result,
            Err(PairingFailure::Ui(UiError::InvalidPasskey(1_000_000)))
        );
    }

    #[test]
    fn test_plan_out_of_band_requires_data() {
        let plan = Stage1Method::plan(
            AssociationModel::OutOfBand,
            Role::Initiator,
            IoCapability::NoInputNoOutput,
            IoCapability::NoInputNoOutput,
            None,
        );
        assert_eq!(plan, Err(PairingFailure::OobNotAvailable));

        let oob = TemporaryKey::new([7; 16]);
        let plan = Stage1Method::plan(
            AssociationModel::OutOfBand,
            Role::Initiator,
            IoCapability::NoInputNoOutput,
            IoCapability::NoInputNoOutput,
            Some(&oob),
        );
        assert_eq!(plan, Ok(Stage1Method::OutOfBand { tk: oob }));
    }
}
