//! Random number source for nonces and passkeys

use rand::rngs::OsRng;
use rand::RngCore;

/// Cryptographically strong random bytes.
///
/// One source may be shared by sessions pairing with different peers at the
/// same time, so implementations must be safe for concurrent use.
pub trait RandomSource: Send + Sync {
    fn fill(&self, buffer: &mut [u8; 16]);
}

/// Random source backed by the operating system CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buffer: &mut [u8; 16]) {
        OsRng.fill_bytes(buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_random_produces_fresh_values() {
        let mut first = [0u8; 16];
        let mut second = [0u8; 16];

        OsRandom.fill(&mut first);
        OsRandom.fill(&mut second);

        assert_ne!(first, second);
    }
}
