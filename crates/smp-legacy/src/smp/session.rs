//! Pairing session for one LE Legacy Pairing attempt
//!
//! A session takes the pairing features already exchanged by the caller,
//! chooses the association model, produces the TK and runs stage 2. It
//! returns the STK or a single `PairingFailure`; retrying is up to the
//! bonding manager that created it.

use super::crypto::{CommitOperands, LegacyCrypto, PairingCrypto};
use super::interaction::{NoInteraction, UserInteraction};
use super::pairing::{PairingRequest, PairingResponse};
use super::random::{OsRandom, RandomSource};
use super::selector::select;
use super::stage1::Stage1Method;
use super::stage2::{Stage2Engine, Stage2State};
use super::transport::SmpTransport;
use super::types::*;
use crate::gap::AddressWithType;
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;

/// Everything one pairing attempt needs, supplied by the bonding manager
pub struct InitialInformations {
    /// Local role in the pairing
    pub role: Role,
    /// Local device address
    pub local_address: AddressWithType,
    /// Peer device address
    pub peer_address: AddressWithType,
    /// Pairing Request sent by the initiator
    pub pairing_request: PairingRequest,
    /// Pairing Response sent by the responder
    pub pairing_response: PairingResponse,
    /// TK received out of band, if any
    pub oob_data: Option<TemporaryKey>,
    /// SMP channel to the peer
    pub transport: Box<dyn SmpTransport>,
    /// Random source for nonces and passkeys
    pub rng: Arc<dyn RandomSource>,
    /// Passkey display and entry
    pub ui: Arc<dyn UserInteraction>,
    /// c1 and s1
    pub crypto: Arc<dyn PairingCrypto>,
}

impl InitialInformations {
    /// Create with OS randomness, no user interaction and the standard c1/s1
    pub fn new(
        role: Role,
        local_address: AddressWithType,
        peer_address: AddressWithType,
        pairing_request: PairingRequest,
        pairing_response: PairingResponse,
        transport: Box<dyn SmpTransport>,
    ) -> Self {
        Self {
            role,
            local_address,
            peer_address,
            pairing_request,
            pairing_response,
            oob_data: None,
            transport,
            rng: Arc::new(OsRandom),
            ui: Arc::new(NoInteraction),
            crypto: Arc::new(LegacyCrypto),
        }
    }

    pub fn with_oob_data(mut self, oob_data: TemporaryKey) -> Self {
        self.oob_data = Some(oob_data);
        self
    }

    pub fn with_user_interaction(mut self, ui: Arc<dyn UserInteraction>) -> Self {
        self.ui = ui;
        self
    }

    pub fn with_random_source(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_crypto(mut self, crypto: Arc<dyn PairingCrypto>) -> Self {
        self.crypto = crypto;
        self
    }

    /// Features the local device sent
    pub fn local_features(&self) -> &PairingRequest {
        match self.role {
            Role::Initiator => &self.pairing_request,
            Role::Responder => &self.pairing_response,
        }
    }

    /// Features the peer sent
    pub fn remote_features(&self) -> &PairingRequest {
        match self.role {
            Role::Initiator => &self.pairing_response,
            Role::Responder => &self.pairing_request,
        }
    }

    /// Encryption key size both sides support
    pub fn negotiated_key_size(&self) -> u8 {
        self.pairing_request
            .max_key_size
            .min(self.pairing_response.max_key_size)
    }
}

/// Progress of a pairing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Not started
    Idle,
    /// Producing the Temporary Key
    Stage1,
    /// Confirm/random exchange
    Stage2,
    /// STK returned
    Done,
    /// Failure returned
    Failed,
}

/// One LE Legacy Pairing attempt
pub struct PairingSession {
    info: InitialInformations,
    stage2: Stage2Engine,
    model: Option<AssociationModel>,
    phase: SessionPhase,
}

impl PairingSession {
    pub fn new(info: InitialInformations) -> Self {
        let operands = CommitOperands::new(
            info.role,
            info.local_address,
            info.peer_address,
            info.pairing_request.serialize(true),
            info.pairing_response.serialize(false),
        );
        let stage2 = Stage2Engine::new(info.role, operands, info.crypto.clone());

        Self {
            info,
            stage2,
            model: None,
            phase: SessionPhase::Idle,
        }
    }

    pub fn role(&self) -> Role {
        self.info.role
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn stage2_state(&self) -> Stage2State {
        self.stage2.state()
    }

    /// Model chosen by the last run, once selection has happened
    pub fn selected_model(&self) -> Option<AssociationModel> {
        self.model
    }

    /// Choose the association model from the exchanged features.
    ///
    /// Reserved IO capability or OOB flag values are reported as
    /// `UnreachableState`.
    pub fn association_model(&self) -> PairingResult<AssociationModel> {
        let local = self.info.local_features();
        let remote = self.info.remote_features();

        Ok(select(
            io_capability(local, "local")?,
            io_capability(remote, "remote")?,
            local.auth_requirements(),
            remote.auth_requirements(),
            oob_data_flag(local, "local")?,
            oob_data_flag(remote, "remote")?,
        ))
    }

    /// Run the pairing to completion
    pub async fn run(&mut self) -> PairingResult<ShortTermKey> {
        self.run_until(std::future::pending()).await
    }

    /// Run the pairing, giving up with `Cancelled` when `cancel` completes first
    pub async fn run_until<F>(&mut self, cancel: F) -> PairingResult<ShortTermKey>
    where
        F: Future<Output = ()>,
    {
        if self.phase != SessionPhase::Idle {
            return Err(PairingFailure::UnreachableState(format!(
                "pairing session already in phase {:?}",
                self.phase
            )));
        }

        info!(
            "Starting legacy pairing with {} as {}",
            self.info.peer_address, self.info.role
        );

        let result = tokio::select! {
            result = self.execute() => result,
            _ = cancel => Err(PairingFailure::Cancelled),
        };

        self.finish(result)
    }

    async fn execute(&mut self) -> PairingResult<ShortTermKey> {
        let model = self.association_model()?;
        self.model = Some(model);
        debug!("Association model with {}: {}", self.info.peer_address, model);

        self.phase = SessionPhase::Stage1;
        let local_io = io_capability(self.info.local_features(), "local")?;
        let remote_io = io_capability(self.info.remote_features(), "remote")?;
        let method = Stage1Method::plan(
            model,
            self.info.role,
            local_io,
            remote_io,
            self.info.oob_data.as_ref(),
        )?;
        let tk = method
            .temporary_key(
                &self.info.peer_address,
                self.info.rng.as_ref(),
                self.info.ui.as_ref(),
            )
            .await?;

        self.phase = SessionPhase::Stage2;
        self.stage2
            .run(&tk, self.info.rng.as_ref(), self.info.transport.as_mut())
            .await
    }

    fn finish(&mut self, result: PairingResult<ShortTermKey>) -> PairingResult<ShortTermKey> {
        match result {
            Ok(stk) => {
                self.phase = SessionPhase::Done;
                let level = self.model.map(|model| model.security_level());
                info!(
                    "Legacy pairing with {} complete, security level {:?}",
                    self.info.peer_address, level
                );
                Ok(stk)
            }
            Err(err) => {
                self.stage2.abort();
                self.phase = SessionPhase::Failed;
                warn!("Legacy pairing with {} failed: {}", self.info.peer_address, err);
                Err(err)
            }
        }
    }
}

fn io_capability(features: &PairingRequest, side: &str) -> PairingResult<IoCapability> {
    features.io_capability().ok_or_else(|| {
        PairingFailure::UnreachableState(format!(
            "{} IO capability 0x{:02X} is reserved",
            side, features.io_capability
        ))
    })
}

fn oob_data_flag(features: &PairingRequest, side: &str) -> PairingResult<OobDataFlag> {
    features.oob_data_flag().ok_or_else(|| {
        PairingFailure::UnreachableState(format!(
            "{} OOB data flag 0x{:02X} is reserved",
            side, features.oob_data_present
        ))
    })
}
