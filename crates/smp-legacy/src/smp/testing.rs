//! Scripted collaborators for pairing tests

use super::constants::*;
use super::crypto::{LegacyCrypto, PairingCrypto};
use super::interaction::{UiError, UserInteraction};
use super::random::RandomSource;
use super::types::*;
use crate::gap::AddressWithType;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Random source returning queued values in order
pub struct FixedRandom {
    values: Mutex<VecDeque<[u8; 16]>>,
}

impl FixedRandom {
    pub fn new(values: impl IntoIterator<Item = [u8; 16]>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }
}

impl RandomSource for FixedRandom {
    fn fill(&self, buffer: &mut [u8; 16]) {
        *buffer = self
            .values
            .lock()
            .unwrap()
            .pop_front()
            .expect("random source exhausted");
    }
}

/// User interaction that records displayed passkeys and answers prompts
/// from a script or from the passkey another `ScriptedUi` displayed.
pub struct ScriptedUi {
    displayed: Mutex<Vec<u32>>,
    prompts: AtomicUsize,
    answer: Mutex<Option<Result<u32, UiError>>>,
    relay: Option<Arc<watch::Sender<Option<u32>>>>,
}

impl ScriptedUi {
    fn with(answer: Option<Result<u32, UiError>>, relay: Option<Arc<watch::Sender<Option<u32>>>>) -> Self {
        Self {
            displayed: Mutex::new(Vec::new()),
            prompts: AtomicUsize::new(0),
            answer: Mutex::new(answer),
            relay,
        }
    }

    /// Prompts return `answer` once
    pub fn answering(answer: Result<u32, UiError>) -> Self {
        Self::with(Some(answer), None)
    }

    /// Prompts never return
    pub fn silent() -> Self {
        Self::with(None, None)
    }

    /// Two surfaces where a prompt on one returns what the other displayed
    pub fn relay_pair() -> (Arc<Self>, Arc<Self>) {
        let (tx, _rx) = watch::channel(None);
        let tx = Arc::new(tx);
        (
            Arc::new(Self::with(None, Some(tx.clone()))),
            Arc::new(Self::with(None, Some(tx))),
        )
    }

    pub fn displayed(&self) -> Vec<u32> {
        self.displayed.lock().unwrap().clone()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserInteraction for ScriptedUi {
    fn display_passkey(&self, _peer: &AddressWithType, passkey: Passkey) {
        self.displayed.lock().unwrap().push(passkey.value());
        if let Some(relay) = &self.relay {
            relay.send_replace(Some(passkey.value()));
        }
    }

    async fn prompt_passkey_entry(&self, _peer: &AddressWithType) -> Result<u32, UiError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);

        if let Some(relay) = &self.relay {
            let mut rx = relay.subscribe();
            let shown = *rx
                .wait_for(|value| value.is_some())
                .await
                .map_err(|_| UiError::Cancelled)?;
            return shown.ok_or(UiError::Unavailable);
        }

        let answer = self.answer.lock().unwrap().take();
        match answer {
            Some(answer) => answer,
            None => std::future::pending().await,
        }
    }
}

/// One recorded `commit` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitCall {
    pub nonce: RandomNonce,
    pub preq: [u8; SMP_PAIRING_REQUEST_LEN],
    pub pres: [u8; SMP_PAIRING_REQUEST_LEN],
    pub addr_type_a: u8,
    pub addr_a: [u8; 6],
    pub addr_type_b: u8,
    pub addr_b: [u8; 6],
}

/// Crypto that records its operands and delegates to `LegacyCrypto`
#[derive(Default)]
pub struct RecordingCrypto {
    pub commits: Mutex<Vec<CommitCall>>,
    pub derives: Mutex<Vec<(RandomNonce, RandomNonce)>>,
}

impl PairingCrypto for RecordingCrypto {
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
        self.commits.lock().unwrap().push(CommitCall {
            nonce: *nonce,
            preq: *preq,
            pres: *pres,
            addr_type_a,
            addr_a: *addr_a,
            addr_type_b,
            addr_b: *addr_b,
        });
        LegacyCrypto.commit(key, nonce, preq, pres, addr_type_a, addr_a, addr_type_b, addr_b)
    }

    fn derive(
        &self,
        key: &TemporaryKey,
        nonce_a: &RandomNonce,
        nonce_b: &RandomNonce,
    ) -> ShortTermKey {
        self.derives.lock().unwrap().push((*nonce_a, *nonce_b));
        LegacyCrypto.derive(key, nonce_a, nonce_b)
    }
}
