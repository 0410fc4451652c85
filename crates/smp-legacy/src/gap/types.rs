use crate::gap::constants::*;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressType {
    Public,
    Random,
    PublicIdentity,
    RandomIdentity,
}

impl AddressType {
    /// Single-bit address type used by the pairing confirm function
    /// (0 for public addresses, 1 for random addresses).
    pub fn confirm_bit(&self) -> u8 {
        match self {
            AddressType::Public | AddressType::PublicIdentity => PUBLIC_DEVICE_ADDRESS,
            AddressType::Random | AddressType::RandomIdentity => RANDOM_DEVICE_ADDRESS,
        }
    }
}

/// Bluetooth device address, stored least significant octet first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BdAddr {
    pub bytes: [u8; BD_ADDR_LEN],
}

impl BdAddr {
    pub fn new(bytes: [u8; BD_ADDR_LEN]) -> Self {
        Self { bytes }
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.bytes[5],
            self.bytes[4],
            self.bytes[3],
            self.bytes[2],
            self.bytes[1],
            self.bytes[0]
        )
    }
}

/// Error returned when parsing a colon separated device address
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid device address: {0}")]
pub struct ParseBdAddrError(String);

impl FromStr for BdAddr {
    type Err = ParseBdAddrError;

    /// Parses the human readable form `AA:BB:CC:DD:EE:FF`, most significant octet first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != BD_ADDR_LEN {
            return Err(ParseBdAddrError(s.to_string()));
        }

        let mut bytes = [0u8; BD_ADDR_LEN];
        for (i, part) in parts.iter().enumerate() {
            bytes[BD_ADDR_LEN - 1 - i] =
                u8::from_str_radix(part, 16).map_err(|_| ParseBdAddrError(s.to_string()))?;
        }

        Ok(Self { bytes })
    }
}

/// A device address together with its address type.
///
/// Both the local and the peer address are fixed for the lifetime of a
/// pairing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressWithType {
    pub address: BdAddr,
    pub address_type: AddressType,
}

impl AddressWithType {
    pub fn new(address: BdAddr, address_type: AddressType) -> Self {
        Self {
            address,
            address_type,
        }
    }

    pub fn public(address: BdAddr) -> Self {
        Self::new(address, AddressType::Public)
    }

    pub fn random(address: BdAddr) -> Self {
        Self::new(address, AddressType::Random)
    }
}

impl fmt::Display for AddressWithType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.address, self.address_type)
    }
}
