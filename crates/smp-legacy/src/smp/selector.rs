//! Association model selection for LE Legacy Pairing
//!
//! The model is chosen from both sides' pairing features
//! (Bluetooth Core Vol 3, Part H, 2.3.5.1).

use super::types::*;

/// Choose the association model for a legacy pairing.
///
/// 1. Neither side asks for MITM protection: Just Works.
/// 2. Both sides have OOB data: Out of Band.
/// 3. Either side has no input and no output: Just Works.
/// 4. Both sides can only display: Just Works.
/// 5. Otherwise: Passkey Entry.
pub fn select(
    local_io: IoCapability,
    remote_io: IoCapability,
    local_auth: AuthRequirements,
    remote_auth: AuthRequirements,
    local_oob: OobDataFlag,
    remote_oob: OobDataFlag,
) -> AssociationModel {
    if !local_auth.mitm && !remote_auth.mitm {
        return AssociationModel::JustWorks;
    }

    if local_oob == OobDataFlag::Present && remote_oob == OobDataFlag::Present {
        return AssociationModel::OutOfBand;
    }

    if local_io == IoCapability::NoInputNoOutput || remote_io == IoCapability::NoInputNoOutput {
        return AssociationModel::JustWorks;
    }

    if local_io.is_display() && remote_io.is_display() {
        return AssociationModel::JustWorks;
    }

    AssociationModel::PasskeyEntry
}

#[cfg(test)]
mod tests {
    use super::*;

    const OOB: [OobDataFlag; 2] = [OobDataFlag::Absent, OobDataFlag::Present];

    /// The decision table written out independently of `select`
    fn expected(
        local_io: IoCapability,
        remote_io: IoCapability,
        mitm: bool,
        both_oob: bool,
    ) -> AssociationModel {
        use IoCapability::*;

        if !mitm {
            return AssociationModel::JustWorks;
        }
        if both_oob {
            return AssociationModel::OutOfBand;
        }
        match (local_io, remote_io) {
            (NoInputNoOutput, _) | (_, NoInputNoOutput) => AssociationModel::JustWorks,
            (DisplayOnly | DisplayYesNo, DisplayOnly | DisplayYesNo) => AssociationModel::JustWorks,
            _ => AssociationModel::PasskeyEntry,
        }
    }

    #[test]
    fn test_select_exhaustive() {
        let mut checked = 0;

        for local_io in IoCapability::ALL {
            for remote_io in IoCapability::ALL {
                for local_mitm in [false, true] {
                    for remote_mitm in [false, true] {
                        for local_oob in OOB {
                            for remote_oob in OOB {
                                let model = select(
                                    local_io,
                                    remote_io,
                                    AuthRequirements::new(true, local_mitm),
                                    AuthRequirements::new(false, remote_mitm),
                                    local_oob,
                                    remote_oob,
                                );

                                let both_oob = local_oob == OobDataFlag::Present
                                    && remote_oob == OobDataFlag::Present;
                                assert_eq!(
                                    model,
                                    expected(local_io, remote_io, local_mitm || remote_mitm, both_oob),
                                    "{} / {} mitm=({}, {}) oob=({:?}, {:?})",
                                    local_io,
                                    remote_io,
                                    local_mitm,
                                    remote_mitm,
                                    local_oob,
                                    remote_oob
                                );
                                checked += 1;
                            }
                        }
                    }
                }
            }
        }

        assert_eq!(checked, 5 * 5 * 2 * 2 * 2 * 2);
    }

    #[test]
    fn test_select_is_symmetric() {
        for local_io in IoCapability::ALL {
            for remote_io in IoCapability::ALL {
                let forward = select(
                    local_io,
                    remote_io,
                    AuthRequirements::mitm(),
                    AuthRequirements::bonding(),
                    OobDataFlag::Absent,
                    OobDataFlag::Present,
                );
                let backward = select(
                    remote_io,
                    local_io,
                    AuthRequirements::bonding(),
                    AuthRequirements::mitm(),
                    OobDataFlag::Present,
                    OobDataFlag::Absent,
                );
                assert_eq!(forward, backward);
            }
        }
    }

    #[test]
    fn test_select_known_cases() {
        let mitm = AuthRequirements::mitm();
        let none = AuthRequirements::bonding();

        // OOB data alone is not enough without MITM
        assert_eq!(
            select(
                IoCapability::KeyboardDisplay,
                IoCapability::KeyboardDisplay,
                none,
                none,
                OobDataFlag::Present,
                OobDataFlag::Present,
            ),
            AssociationModel::JustWorks
        );

        // OOB wins over a NoInputNoOutput peer
        assert_eq!(
            select(
                IoCapability::NoInputNoOutput,
                IoCapability::KeyboardOnly,
                mitm,
                none,
                OobDataFlag::Present,
                OobDataFlag::Present,
            ),
            AssociationModel::OutOfBand
        );

        assert_eq!(
            select(
                IoCapability::DisplayOnly,
                IoCapability::KeyboardOnly,
                none,
                mitm,
                OobDataFlag::Absent,
                OobDataFlag::Present,
            ),
            AssociationModel::PasskeyEntry
        );

        assert_eq!(
            select(
                IoCapability::DisplayYesNo,
                IoCapability::DisplayOnly,
                mitm,
                mitm,
                OobDataFlag::Absent,
                OobDataFlag::Absent,
            ),
            AssociationModel::JustWorks
        );
    }
}
