//! Cryptographic functions for LE Legacy Pairing
//!
//! This module implements the confirm value generation function c1 and the
//! key generation function s1 (Bluetooth Core Vol 3, Part H, 2.2.3 and 2.2.4)
//! on top of the security function e, which is AES-128.
//!
//! All values are held least significant octet first, the order in which
//! they travel over the air. The Bluetooth Core notation is most significant
//! octet first, so `aes_128` reverses its operands around the block cipher.

use super::constants::*;
use super::types::*;
use crate::gap::AddressWithType;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes128;

/// Security function e (Bluetooth Core Vol 3, Part H, 2.2.1)
pub fn aes_128(key: &[u8; 16], data: &[u8; 16]) -> [u8; 16] {
    let mut key_be = *key;
    key_be.reverse();
    let mut block_be = *data;
    block_be.reverse();

    let cipher = Aes128::new(GenericArray::from_slice(&key_be));
    let mut block = GenericArray::clone_from_slice(&block_be);
    cipher.encrypt_block(&mut block);

    let mut output = [0u8; 16];
    output.copy_from_slice(&block);
    output.reverse();
    output
}

/// Function c1 for LE Legacy Pairing (Bluetooth Core Vol 3, Part H, 2.2.3)
#[allow(clippy::too_many_arguments)]
pub fn c1(
    temp_key: &[u8; 16],
    rand: &[u8; 16],
    preq: &[u8; SMP_PAIRING_REQUEST_LEN],
    pres: &[u8; SMP_PAIRING_REQUEST_LEN],
    init_addr_type: u8,
    init_addr: &[u8; 6],
    resp_addr_type: u8,
    resp_addr: &[u8; 6],
) -> [u8; 16] {
    // p1 = pres || preq || rat' || iat'
    let mut p1 = [0u8; 16];
    p1[0] = init_addr_type;
    p1[1] = resp_addr_type;
    p1[2..9].copy_from_slice(preq);
    p1[9..16].copy_from_slice(pres);

    // p2 = padding || ia || ra
    let mut p2 = [0u8; 16];
    p2[0..6].copy_from_slice(resp_addr);
    p2[6..12].copy_from_slice(init_addr);

    let mut r_prime = *rand;
    xor_in_place(&mut r_prime, &p1);

    let mut res = aes_128(temp_key, &r_prime);
    xor_in_place(&mut res, &p2);

    aes_128(temp_key, &res)
}

/// Function s1 for LE Legacy Pairing (Bluetooth Core Vol 3, Part H, 2.2.4)
///
/// `r1` is the responder random (Srand) and `r2` the initiator random (Mrand).
pub fn s1(temp_key: &[u8; 16], r1: &[u8; 16], r2: &[u8; 16]) -> [u8; 16] {
    // r' = r1' || r2', the least significant 64 bits of each
    let mut r_prime = [0u8; 16];
    r_prime[0..8].copy_from_slice(&r2[0..8]);
    r_prime[8..16].copy_from_slice(&r1[0..8]);

    aes_128(temp_key, &r_prime)
}

fn xor_in_place(target: &mut [u8; 16], other: &[u8; 16]) {
    for (t, o) in target.iter_mut().zip(other.iter()) {
        *t ^= o;
    }
}

/// The one-way functions legacy pairing is built on.
///
/// Operands are always passed initiator first: `preq` is the Pairing
/// Request, slot A is the initiator address and `nonce_a` the initiator
/// random, whichever side makes the call.
pub trait PairingCrypto: Send + Sync {
    /// Commitment over a random value (c1)
    #[allow(clippy::too_many_arguments)]
    fn commit(
        &self,
        key: &TemporaryKey,
        nonce: &RandomNonce,
        preq: &[u8; SMP_PAIRING_REQUEST_LEN],
        pres: &[u8; SMP_PAIRING_REQUEST_LEN],
        addr_type_a: u8,
        addr_a: &[u8; 6],
        addr_type_b: u8,
        addr_b: &[u8; 6],
    ) -> ConfirmValue;

    /// Short Term Key derivation (s1)
    fn derive(&self, key: &TemporaryKey, nonce_a: &RandomNonce, nonce_b: &RandomNonce)
        -> ShortTermKey;
}

/// AES-128 based c1/s1 as defined by Bluetooth Core
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyCrypto;

impl PairingCrypto for LegacyCrypto {
    fn commit(
        &self,
        key: &TemporaryKey,
        nonce: &RandomNonce,
        preq: &[u8; SMP_PAIRING_REQUEST_LEN],
        pres: &[u8; SMP_PAIRING_REQUEST_LEN],
        addr_type_a: u8,
        addr_a: &[u8; 6],
        addr_type_b: u8,
        addr_b: &[u8; 6],
    ) -> ConfirmValue {
        ConfirmValue::new(c1(
            key.as_bytes(),
            nonce.as_bytes(),
            preq,
            pres,
            addr_type_a,
            addr_a,
            addr_type_b,
            addr_b,
        ))
    }

    fn derive(
        &self,
        key: &TemporaryKey,
        nonce_a: &RandomNonce,
        nonce_b: &RandomNonce,
    ) -> ShortTermKey {
        ShortTermKey::new(s1(key.as_bytes(), nonce_b.as_bytes(), nonce_a.as_bytes()))
    }
}

/// Commitment operands of one pairing, fixed in initiator-first order.
///
/// Built once from the local role; afterwards the role plays no part in
/// how confirm values and the STK are computed.
#[derive(Debug, Clone)]
pub struct CommitOperands {
    preq: [u8; SMP_PAIRING_REQUEST_LEN],
    pres: [u8; SMP_PAIRING_REQUEST_LEN],
    initiator: AddressWithType,
    responder: AddressWithType,
}

impl CommitOperands {
    pub fn new(
        role: Role,
        local: AddressWithType,
        peer: AddressWithType,
        preq: [u8; SMP_PAIRING_REQUEST_LEN],
        pres: [u8; SMP_PAIRING_REQUEST_LEN],
    ) -> Self {
        let (initiator, responder) = match role {
            Role::Initiator => (local, peer),
            Role::Responder => (peer, local),
        };

        Self {
            preq,
            pres,
            initiator,
            responder,
        }
    }

    pub fn initiator(&self) -> &AddressWithType {
        &self.initiator
    }

    pub fn responder(&self) -> &AddressWithType {
        &self.responder
    }

    /// Confirm value for `nonce`, whichever side generated it
    pub fn confirm(
        &self,
        crypto: &dyn PairingCrypto,
        tk: &TemporaryKey,
        nonce: &RandomNonce,
    ) -> ConfirmValue {
        crypto.commit(
            tk,
            nonce,
            &self.preq,
            &self.pres,
            self.initiator.address_type.confirm_bit(),
            &self.initiator.address.bytes,
            self.responder.address_type.confirm_bit(),
            &self.responder.address.bytes,
        )
    }

    /// Short Term Key from the initiator and responder randoms
    pub fn short_term_key(
        &self,
        crypto: &dyn PairingCrypto,
        tk: &TemporaryKey,
        initiator_nonce: &RandomNonce,
        responder_nonce: &RandomNonce,
    ) -> ShortTermKey {
        crypto.derive(tk, initiator_nonce, responder_nonce)
    }
}
