// Address type bit used by c1
pub const PUBLIC_DEVICE_ADDRESS: u8 = 0x00;
pub const RANDOM_DEVICE_ADDRESS: u8 = 0x01;

// Length of a device address on the wire
pub const BD_ADDR_LEN: usize = 6;
