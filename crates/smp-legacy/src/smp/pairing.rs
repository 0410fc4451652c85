//! Pairing PDUs used by LE Legacy Pairing
//!
//! Packets are handled with their SMP command code as the first octet,
//! exactly as carried on the SMP fixed channel.

use super::constants::*;
use super::transport::LinkError;
use super::types::*;

/// Pairing request/response packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingRequest {
    /// IO capability
    pub io_capability: u8,
    /// OOB data flag
    pub oob_data_present: u8,
    /// Authentication requirements
    pub auth_req: u8,
    /// Maximum encryption key size
    pub max_key_size: u8,
    /// Initiator key distribution
    pub initiator_key_dist: u8,
    /// Responder key distribution
    pub responder_key_dist: u8,
}

/// The pairing response carries the same fields as the request
pub type PairingResponse = PairingRequest;

impl PairingRequest {
    /// Create new pairing request
    pub fn new(
        io_capability: IoCapability,
        oob_data: OobDataFlag,
        auth_req: AuthRequirements,
        max_key_size: u8,
        initiator_key_dist: KeyDistribution,
        responder_key_dist: KeyDistribution,
    ) -> Self {
        Self {
            io_capability: io_capability.to_u8(),
            oob_data_present: oob_data.to_u8(),
            auth_req: auth_req.to_u8(),
            max_key_size,
            initiator_key_dist: initiator_key_dist.to_u8(),
            responder_key_dist: responder_key_dist.to_u8(),
        }
    }

    /// Request with default key size and key distribution
    pub fn with_capabilities(
        io_capability: IoCapability,
        oob_data: OobDataFlag,
        auth_req: AuthRequirements,
    ) -> Self {
        Self::new(
            io_capability,
            oob_data,
            auth_req,
            SMP_MAX_ENCRYPTION_KEY_SIZE,
            KeyDistribution::all(),
            KeyDistribution::all(),
        )
    }

    /// IO capability, `None` for reserved values
    pub fn io_capability(&self) -> Option<IoCapability> {
        IoCapability::from_u8(self.io_capability)
    }

    /// OOB data flag, `None` for reserved values
    pub fn oob_data_flag(&self) -> Option<OobDataFlag> {
        OobDataFlag::from_u8(self.oob_data_present)
    }

    /// Authentication requirements
    pub fn auth_requirements(&self) -> AuthRequirements {
        AuthRequirements::from_u8(self.auth_req)
    }

    /// Parse from raw packet
    pub fn parse(data: &[u8]) -> Result<Self, LinkError> {
        if data.len() < SMP_PAIRING_REQUEST_LEN {
            return Err(LinkError::Malformed("Pairing request too short".into()));
        }

        if data[0] != SMP_PAIRING_REQUEST && data[0] != SMP_PAIRING_RESPONSE {
            return Err(LinkError::UnexpectedPdu(data[0]));
        }

        Ok(Self {
            io_capability: data[1],
            oob_data_present: data[2],
            auth_req: data[3],
            max_key_size: data[4],
            initiator_key_dist: data[5],
            responder_key_dist: data[6],
        })
    }

    /// Serialize to raw packet
    pub fn serialize(&self, is_request: bool) -> [u8; SMP_PAIRING_REQUEST_LEN] {
        [
            if is_request {
                SMP_PAIRING_REQUEST
            } else {
                SMP_PAIRING_RESPONSE
            },
            self.io_capability,
            self.oob_data_present,
            self.auth_req,
            self.max_key_size,
            self.initiator_key_dist,
            self.responder_key_dist,
        ]
    }
}

/// Pairing confirm packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingConfirm {
    /// Confirm value
    pub confirm_value: ConfirmValue,
}

impl PairingConfirm {
    /// Create new pairing confirm
    pub fn new(confirm_value: ConfirmValue) -> Self {
        Self { confirm_value }
    }

    /// Parse from raw packet
    pub fn parse(data: &[u8]) -> Result<Self, LinkError> {
        let value = parse_octet16(data, SMP_PAIRING_CONFIRM, "Pairing confirm too short")?;
        Ok(Self {
            confirm_value: ConfirmValue::new(value),
        })
    }

    /// Serialize to raw packet
    pub fn serialize(&self) -> Vec<u8> {
        let mut packet = Vec::with_capacity(SMP_PAIRING_CONFIRM_LEN);

        packet.push(SMP_PAIRING_CONFIRM);
        packet.extend_from_slice(self.confirm_value.as_bytes());

        packet
    }
}

/// Pairing random packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingRandom {
    /// Random value
    pub random_value: RandomNonce,
}

impl PairingRandom {
    /// Create new pairing random
    pub fn new(random_value: RandomNonce) -> Self {
        Self { random_value }
    }

    /// Parse from raw packet
    pub fn parse(data: &[u8]) -> Result<Self, LinkError> {
        let value = parse_octet16(data, SMP_PAIRING_RANDOM, "Pairing random too short")?;
        Ok(Self {
            random_value: RandomNonce::new(value),
        })
    }

    /// Serialize to raw packet
    pub fn serialize(&self) -> Vec<u8> {
        let mut packet = Vec::with_capacity(SMP_PAIRING_RANDOM_LEN);

        packet.push(SMP_PAIRING_RANDOM);
        packet.extend_from_slice(self.random_value.as_bytes());

        packet
    }
}

/// Pairing failed packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingFailed {
    /// Reason code
    pub reason: FailureReason,
}

impl PairingFailed {
    /// Create new pairing failed
    pub fn new(reason: FailureReason) -> Self {
        Self { reason }
    }

    /// Parse from raw packet
    pub fn parse(data: &[u8]) -> Result<Self, LinkError> {
        if data.len() < SMP_PAIRING_FAILED_LEN {
            return Err(LinkError::Malformed("Pairing failed too short".into()));
        }

        if data[0] != SMP_PAIRING_FAILED {
            return Err(LinkError::UnexpectedPdu(data[0]));
        }

        Ok(Self {
            reason: FailureReason::from_u8(data[1]),
        })
    }

    /// Serialize to raw packet
    pub fn serialize(&self) -> Vec<u8> {
        vec![SMP_PAIRING_FAILED, self.reason.to_u8()]
    }
}

fn parse_octet16(data: &[u8], code: u8, too_short: &str) -> Result<[u8; SMP_KEY_SIZE], LinkError> {
    if data.len() < 1 + SMP_KEY_SIZE {
        return Err(LinkError::Malformed(too_short.into()));
    }

    if data[0] != code {
        return Err(LinkError::UnexpectedPdu(data[0]));
    }

    let mut value = [0u8; SMP_KEY_SIZE];
    value.copy_from_slice(&data[1..1 + SMP_KEY_SIZE]);
    Ok(value)
}
