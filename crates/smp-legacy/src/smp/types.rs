//! Type definitions for the Security Manager Protocol
use super::constants::*;
use super::interaction::UiError;
use super::transport::LinkError;
use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Terminal failure of a pairing session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingFailure {
    #[error("Transport failure: {0}")]
    Transport(#[from] LinkError),

    #[error("User interaction failed: {0}")]
    Ui(#[from] UiError),

    #[error("Confirm value failed")]
    ConfirmMismatch,

    #[error("Unreachable pairing state: {0}")]
    UnreachableState(String),

    #[error("OOB data not available")]
    OobNotAvailable,

    #[error("Pairing cancelled")]
    Cancelled,
}

impl PairingFailure {
    /// The Pairing Failed reason a bonding manager reports for this failure
    pub fn reason(&self) -> FailureReason {
        match self {
            PairingFailure::Transport(LinkError::RemoteFailure(reason)) => *reason,
            PairingFailure::Transport(LinkError::Malformed(_))
            | PairingFailure::Transport(LinkError::UnexpectedPdu(_)) => {
                FailureReason::InvalidParameters
            }
            PairingFailure::Transport(_) => FailureReason::UnspecifiedReason,
            PairingFailure::Ui(_) => FailureReason::PasskeyEntryFailed,
            PairingFailure::ConfirmMismatch => FailureReason::ConfirmValueFailed,
            PairingFailure::UnreachableState(_) => FailureReason::UnspecifiedReason,
            PairingFailure::OobNotAvailable => FailureReason::OobNotAvailable,
            PairingFailure::Cancelled => FailureReason::UnspecifiedReason,
        }
    }
}

/// Result type for pairing operations
pub type PairingResult<T> = Result<T, PairingFailure>;

/// Reason carried by a Pairing Failed PDU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    PasskeyEntryFailed,
    OobNotAvailable,
    AuthenticationRequirements,
    ConfirmValueFailed,
    PairingNotSupported,
    EncryptionKeySize,
    CommandNotSupported,
    UnspecifiedReason,
    RepeatedAttempts,
    InvalidParameters,
    /// Reason codes this implementation does not interpret
    Other(u8),
}

impl FailureReason {
    /// Convert to u8 value for protocol
    pub fn to_u8(&self) -> u8 {
        match self {
            FailureReason::PasskeyEntryFailed => SMP_REASON_PASSKEY_ENTRY_FAILED,
            FailureReason::OobNotAvailable => SMP_REASON_OOB_NOT_AVAILABLE,
            FailureReason::AuthenticationRequirements => SMP_REASON_AUTHENTICATION_REQUIREMENTS,
            FailureReason::ConfirmValueFailed => SMP_REASON_CONFIRM_VALUE_FAILED,
            FailureReason::PairingNotSupported => SMP_REASON_PAIRING_NOT_SUPPORTED,
            FailureReason::EncryptionKeySize => SMP_REASON_ENCRYPTION_KEY_SIZE,
            FailureReason::CommandNotSupported => SMP_REASON_COMMAND_NOT_SUPPORTED,
            FailureReason::UnspecifiedReason => SMP_REASON_UNSPECIFIED_REASON,
            FailureReason::RepeatedAttempts => SMP_REASON_REPEATED_ATTEMPTS,
            FailureReason::InvalidParameters => SMP_REASON_INVALID_PARAMETERS,
            FailureReason::Other(code) => *code,
        }
    }

    /// Convert from u8 value from protocol
    pub fn from_u8(value: u8) -> Self {
        match value {
            SMP_REASON_PASSKEY_ENTRY_FAILED => FailureReason::PasskeyEntryFailed,
            SMP_REASON_OOB_NOT_AVAILABLE => FailureReason::OobNotAvailable,
            SMP_REASON_AUTHENTICATION_REQUIREMENTS => FailureReason::AuthenticationRequirements,
            SMP_REASON_CONFIRM_VALUE_FAILED => FailureReason::ConfirmValueFailed,
            SMP_REASON_PAIRING_NOT_SUPPORTED => FailureReason::PairingNotSupported,
            SMP_REASON_ENCRYPTION_KEY_SIZE => FailureReason::EncryptionKeySize,
            SMP_REASON_COMMAND_NOT_SUPPORTED => FailureReason::CommandNotSupported,
            SMP_REASON_UNSPECIFIED_REASON => FailureReason::UnspecifiedReason,
            SMP_REASON_REPEATED_ATTEMPTS => FailureReason::RepeatedAttempts,
            SMP_REASON_INVALID_PARAMETERS => FailureReason::InvalidParameters,
            other => FailureReason::Other(other),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::PasskeyEntryFailed => write!(f, "passkey entry failed"),
            FailureReason::OobNotAvailable => write!(f, "OOB not available"),
            FailureReason::AuthenticationRequirements => write!(f, "authentication requirements"),
            FailureReason::ConfirmValueFailed => write!(f, "confirm value failed"),
            FailureReason::PairingNotSupported => write!(f, "pairing not supported"),
            FailureReason::EncryptionKeySize => write!(f, "encryption key size"),
            FailureReason::CommandNotSupported => write!(f, "command not supported"),
            FailureReason::UnspecifiedReason => write!(f, "unspecified reason"),
            FailureReason::RepeatedAttempts => write!(f, "repeated attempts"),
            FailureReason::InvalidParameters => write!(f, "invalid parameters"),
            FailureReason::Other(code) => write!(f, "reason 0x{:02X}", code),
        }
    }
}

/// IO Capability types for pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoCapability {
    /// Display only capability
    DisplayOnly,
    /// Display with yes/no capability
    DisplayYesNo,
    /// Keyboard only
    KeyboardOnly,
    /// No input, no output
    NoInputNoOutput,
    /// Both keyboard and display
    KeyboardDisplay,
}

impl IoCapability {
    pub const ALL: [IoCapability; 5] = [
        IoCapability::DisplayOnly,
        IoCapability::DisplayYesNo,
        IoCapability::KeyboardOnly,
        IoCapability::NoInputNoOutput,
        IoCapability::KeyboardDisplay,
    ];

    /// Convert to u8 value for protocol
    pub fn to_u8(&self) -> u8 {
        match self {
            IoCapability::DisplayOnly => SMP_IO_CAPABILITY_DISPLAY_ONLY,
            IoCapability::DisplayYesNo => SMP_IO_CAPABILITY_DISPLAY_YES_NO,
            IoCapability::KeyboardOnly => SMP_IO_CAPABILITY_KEYBOARD_ONLY,
            IoCapability::NoInputNoOutput => SMP_IO_CAPABILITY_NO_INPUT_NO_OUTPUT,
            IoCapability::KeyboardDisplay => SMP_IO_CAPABILITY_KEYBOARD_DISPLAY,
        }
    }

    /// Convert from u8 value from protocol
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            SMP_IO_CAPABILITY_DISPLAY_ONLY => Some(IoCapability::DisplayOnly),
            SMP_IO_CAPABILITY_DISPLAY_YES_NO => Some(IoCapability::DisplayYesNo),
            SMP_IO_CAPABILITY_KEYBOARD_ONLY => Some(IoCapability::KeyboardOnly),
            SMP_IO_CAPABILITY_NO_INPUT_NO_OUTPUT => Some(IoCapability::NoInputNoOutput),
            SMP_IO_CAPABILITY_KEYBOARD_DISPLAY => Some(IoCapability::KeyboardDisplay),
            _ => None,
        }
    }

    /// Whether the device can show a passkey but not type one
    pub fn is_display(&self) -> bool {
        matches!(self, IoCapability::DisplayOnly | IoCapability::DisplayYesNo)
    }
}

impl fmt::Display for IoCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoCapability::DisplayOnly => write!(f, "Display Only"),
            IoCapability::DisplayYesNo => write!(f, "Display Yes/No"),
            IoCapability::KeyboardOnly => write!(f, "Keyboard Only"),
            IoCapability::NoInputNoOutput => write!(f, "No Input No Output"),
            IoCapability::KeyboardDisplay => write!(f, "Keyboard Display"),
        }
    }
}

/// OOB data flag of a pairing request or response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OobDataFlag {
    Absent,
    Present,
}

impl OobDataFlag {
    /// Convert to u8 value for protocol
    pub fn to_u8(&self) -> u8 {
        match self {
            OobDataFlag::Absent => SMP_OOB_DATA_NOT_PRESENT,
            OobDataFlag::Present => SMP_OOB_DATA_PRESENT,
        }
    }

    /// Convert from u8 value from protocol
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            SMP_OOB_DATA_NOT_PRESENT => Some(OobDataFlag::Absent),
            SMP_OOB_DATA_PRESENT => Some(OobDataFlag::Present),
            _ => None,
        }
    }
}

/// Association model used to produce the Temporary Key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationModel {
    /// Just Works method - no user interaction
    JustWorks,
    /// Passkey Entry - one device enters a passkey
    PasskeyEntry,
    /// Out of Band data
    OutOfBand,
}

impl AssociationModel {
    /// Security level a key produced with this model provides
    pub fn security_level(&self) -> SecurityLevel {
        match self {
            AssociationModel::JustWorks => SecurityLevel::EncryptionOnly,
            AssociationModel::PasskeyEntry | AssociationModel::OutOfBand => {
                SecurityLevel::EncryptionWithAuthentication
            }
        }
    }
}

impl fmt::Display for AssociationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssociationModel::JustWorks => write!(f, "Just Works"),
            AssociationModel::PasskeyEntry => write!(f, "Passkey Entry"),
            AssociationModel::OutOfBand => write!(f, "Out of Band"),
        }
    }
}

/// Authentication requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AuthRequirements {
    /// Whether bonding is required
    pub bonding: bool,
    /// Whether MITM protection is required
    pub mitm: bool,
    /// Whether Secure Connections is required
    pub secure_connections: bool,
    /// Whether keypress notifications are required
    pub keypress_notifications: bool,
    /// Whether CT2 feature is supported
    pub ct2: bool,
}

impl AuthRequirements {
    /// Create new authentication requirements
    pub fn new(bonding: bool, mitm: bool) -> Self {
        Self {
            bonding,
            mitm,
            ..Self::default()
        }
    }

    /// Bonding without MITM protection
    pub fn bonding() -> Self {
        Self::new(true, false)
    }

    /// Bonding with MITM protection
    pub fn mitm() -> Self {
        Self::new(true, true)
    }

    /// Convert to u8 value for protocol
    pub fn to_u8(&self) -> u8 {
        let mut value = 0;

        if self.bonding {
            value |= SMP_AUTH_REQ_BONDING;
        }

        if self.mitm {
            value |= SMP_AUTH_REQ_MITM;
        }

        if self.secure_connections {
            value |= SMP_AUTH_REQ_SC;
        }

        if self.keypress_notifications {
            value |= SMP_AUTH_REQ_KEYPRESS;
        }

        if self.ct2 {
            value |= SMP_AUTH_REQ_CT2;
        }

        value
    }

    /// Convert from u8 value from protocol
    pub fn from_u8(value: u8) -> Self {
        Self {
            bonding: (value & SMP_AUTH_REQ_BONDING) != 0,
            mitm: (value & SMP_AUTH_REQ_MITM) != 0,
            secure_connections: (value & SMP_AUTH_REQ_SC) != 0,
            keypress_notifications: (value & SMP_AUTH_REQ_KEYPRESS) != 0,
            ct2: (value & SMP_AUTH_REQ_CT2) != 0,
        }
    }
}

/// Key distribution preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDistribution {
    /// Encryption key (LTK, EDIV, RAND)
    pub encryption_key: bool,
    /// Identity key (IRK, public address)
    pub identity_key: bool,
    /// Signing key (CSRK)
    pub signing_key: bool,
    /// Link key derivation
    pub link_key: bool,
}

impl KeyDistribution {
    /// Encryption, identity and signing keys
    pub fn all() -> Self {
        Self {
            encryption_key: true,
            identity_key: true,
            signing_key: true,
            link_key: false,
        }
    }

    /// Convert to u8 value for protocol
    pub fn to_u8(&self) -> u8 {
        let mut value = 0;

        if self.encryption_key {
            value |= SMP_KEY_DIST_ENC_KEY;
        }

        if self.identity_key {
            value |= SMP_KEY_DIST_ID_KEY;
        }

        if self.signing_key {
            value |= SMP_KEY_DIST_SIGN_KEY;
        }

        if self.link_key {
            value |= SMP_KEY_DIST_LINK_KEY;
        }

        value
    }

    /// Convert from u8 value from protocol
    pub fn from_u8(value: u8) -> Self {
        Self {
            encryption_key: (value & SMP_KEY_DIST_ENC_KEY) != 0,
            identity_key: (value & SMP_KEY_DIST_ID_KEY) != 0,
            signing_key: (value & SMP_KEY_DIST_SIGN_KEY) != 0,
            link_key: (value & SMP_KEY_DIST_LINK_KEY) != 0,
        }
    }
}

/// Pairing Role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Initiator of the pairing (Central device)
    Initiator,
    /// Responder to pairing (Peripheral device)
    Responder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Initiator => write!(f, "initiator"),
            Role::Responder => write!(f, "responder"),
        }
    }
}

/// Security level for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SecurityLevel {
    /// Encryption without authentication (Just Works)
    EncryptionOnly,
    /// Encryption with authentication (MITM protection)
    EncryptionWithAuthentication,
}

/// Six digit decimal passkey (0 - 999999)
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Passkey(u32);

impl Passkey {
    /// Create a passkey, rejecting values with more than six digits
    pub fn new(value: u32) -> Option<Self> {
        if value <= SMP_PASSKEY_MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Passkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passkey(******)")
    }
}

impl fmt::Display for Passkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

macro_rules! octet16 {
    ($(#[$meta:meta])* $name:ident, secret) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
        pub struct $name([u8; SMP_KEY_SIZE]);

        octet16!(@common $name);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(..)", stringify!($name))
            }
        }
    };
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name([u8; SMP_KEY_SIZE]);

        octet16!(@common $name);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(self.0))
            }
        }
    };
    (@common $name:ident) => {
        impl $name {
            pub const fn new(bytes: [u8; SMP_KEY_SIZE]) -> Self {
                Self(bytes)
            }

            /// Value bytes, least significant octet first
            pub fn as_bytes(&self) -> &[u8; SMP_KEY_SIZE] {
                &self.0
            }
        }

        impl From<[u8; SMP_KEY_SIZE]> for $name {
            fn from(bytes: [u8; SMP_KEY_SIZE]) -> Self {
                Self(bytes)
            }
        }
    };
}

octet16!(
    /// Temporary Key produced by stage 1
    TemporaryKey,
    secret
);

octet16!(
    /// Short Term Key produced by stage 2
    ShortTermKey,
    secret
);

octet16!(
    /// Pairing confirm value (Mconfirm / Sconfirm)
    ConfirmValue
);

octet16!(
    /// Pairing random value (Mrand / Srand)
    RandomNonce
);

impl TemporaryKey {
    /// All-zero key used by Just Works
    pub fn zero() -> Self {
        Self([0u8; SMP_KEY_SIZE])
    }
}

impl ShortTermKey {
    /// Mask the key to the negotiated encryption key size.
    ///
    /// Octets beyond `key_size` are zeroed; sizes outside 7..=16 are clamped.
    pub fn masked(&self, key_size: u8) -> ShortTermKey {
        let size = key_size.clamp(SMP_MIN_ENCRYPTION_KEY_SIZE, SMP_MAX_ENCRYPTION_KEY_SIZE) as usize;
        let mut bytes = self.0;
        bytes[size..].fill(0);
        ShortTermKey(bytes)
    }
}
