//! Legacy pairing phase 2, stage 2: confirm/random exchange and STK
//!
//! Both sides commit to a fresh random value with c1 before revealing it.
//! The initiator sends its confirm first and reveals its random first; the
//! responder only reveals its random after checking the initiator's
//! commitment. The STK is s1 over both randoms.

use super::constants::*;
use super::crypto::{CommitOperands, PairingCrypto};
use super::pairing::{PairingConfirm, PairingFailed, PairingRandom};
use super::random::RandomSource;
use super::transport::SmpTransport;
use super::types::*;
use log::{debug, trace, warn};
use std::sync::Arc;

/// Stage 2 state machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage2State {
    /// Generating the local random
    GenerateNonce,
    /// Exchanging confirm values
    ExchangeConfirm,
    /// Exchanging random values
    ExchangeNonce,
    /// Checking the peer's confirm value
    Verify,
    /// STK derived
    Done,
    /// Stage 2 failed
    Failed,
}

impl Stage2State {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage2State::Done | Stage2State::Failed)
    }
}

/// Stage 2 of one pairing attempt
pub struct Stage2Engine {
    role: Role,
    operands: CommitOperands,
    crypto: Arc<dyn PairingCrypto>,
    state: Stage2State,
}

impl Stage2Engine {
    pub fn new(role: Role, operands: CommitOperands, crypto: Arc<dyn PairingCrypto>) -> Self {
        Self {
            role,
            operands,
            crypto,
            state: Stage2State::GenerateNonce,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> Stage2State {
        self.state
    }

    /// Run the exchange with the TK from stage 1.
    ///
    /// Runs at most once; the engine ends in `Done` or `Failed`.
    pub async fn run(
        &mut self,
        tk: &TemporaryKey,
        rng: &dyn RandomSource,
        transport: &mut dyn SmpTransport,
    ) -> PairingResult<ShortTermKey> {
        if self.state != Stage2State::GenerateNonce {
            return Err(PairingFailure::UnreachableState(format!(
                "stage 2 started in state {:?}",
                self.state
            )));
        }

        let result = match self.role {
            Role::Initiator => self.run_initiator(tk, rng, transport).await,
            Role::Responder => self.run_responder(tk, rng, transport).await,
        };

        match &result {
            Ok(_) => self.transition(Stage2State::Done),
            Err(err) => {
                debug!("Stage 2 failed as {} in state {:?}: {}", self.role, self.state, err);
                self.transition(Stage2State::Failed);
            }
        }

        result
    }

    /// Move to `Failed` when stage 2 was interrupted before finishing
    pub fn abort(&mut self) {
        if !self.state.is_terminal() {
            self.transition(Stage2State::Failed);
        }
    }

    async fn run_initiator(
        &mut self,
        tk: &TemporaryKey,
        rng: &dyn RandomSource,
        transport: &mut dyn SmpTransport,
    ) -> PairingResult<ShortTermKey> {
        let mrand = generate_nonce(rng);
        let mconfirm = self.operands.confirm(self.crypto.as_ref(), tk, &mrand);

        self.transition(Stage2State::ExchangeConfirm);
        transport.send(&PairingConfirm::new(mconfirm).serialize()).await?;
        let sconfirm = receive_confirm(transport).await?;

        self.transition(Stage2State::ExchangeNonce);
        transport.send(&PairingRandom::new(mrand).serialize()).await?;
        let srand = receive_random(transport).await?;

        self.transition(Stage2State::Verify);
        self.verify(transport, tk, &srand, &sconfirm).await?;

        Ok(self
            .operands
            .short_term_key(self.crypto.as_ref(), tk, &mrand, &srand))
    }

    async fn run_responder(
        &mut self,
        tk: &TemporaryKey,
        rng: &dyn RandomSource,
        transport: &mut dyn SmpTransport,
    ) -> PairingResult<ShortTermKey> {
        let srand = generate_nonce(rng);
        let sconfirm = self.operands.confirm(self.crypto.as_ref(), tk, &srand);

        self.transition(Stage2State::ExchangeConfirm);
        let mconfirm = receive_confirm(transport).await?;
        transport.send(&PairingConfirm::new(sconfirm).serialize()).await?;

        self.transition(Stage2State::ExchangeNonce);
        let mrand = receive_random(transport).await?;

        self.transition(Stage2State::Verify);
        self.verify(transport, tk, &mrand, &mconfirm).await?;
        transport.send(&PairingRandom::new(srand).serialize()).await?;

        Ok(self
            .operands
            .short_term_key(self.crypto.as_ref(), tk, &mrand, &srand))
    }

    /// Check the peer's confirm against its revealed random
    async fn verify(
        &self,
        transport: &mut dyn SmpTransport,
        tk: &TemporaryKey,
        peer_nonce: &RandomNonce,
        peer_confirm: &ConfirmValue,
    ) -> PairingResult<()> {
        let expected = self.operands.confirm(self.crypto.as_ref(), tk, peer_nonce);
        if expected == *peer_confirm {
            return Ok(());
        }

        warn!("Confirm value from the peer does not match its random");
        let failed = PairingFailed::new(FailureReason::ConfirmValueFailed);
        if let Err(err) = transport.send(&failed.serialize()).await {
            debug!("Could not send Pairing Failed: {}", err);
        }

        Err(PairingFailure::ConfirmMismatch)
    }

    fn transition(&mut self, next: Stage2State) {
        trace!("Stage 2 ({}): {:?} -> {:?}", self.role, self.state, next);
        self.state = next;
    }
}

fn generate_nonce(rng: &dyn RandomSource) -> RandomNonce {
    let mut value = [0u8; SMP_KEY_SIZE];
    rng.fill(&mut value);
    RandomNonce::new(value)
}

async fn receive_confirm(transport: &mut dyn SmpTransport) -> PairingResult<ConfirmValue> {
    let pdu = transport.receive(SMP_PAIRING_CONFIRM).await?;
    Ok(PairingConfirm::parse(&pdu)?.confirm_value)
}

async fn receive_random(transport: &mut dyn SmpTransport) -> PairingResult<RandomNonce> {
    let pdu = transport.receive(SMP_PAIRING_RANDOM).await?;
    Ok(PairingRandom::parse(&pdu)?.random_value)
}
