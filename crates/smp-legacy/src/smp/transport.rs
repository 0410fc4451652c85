//! SMP transport abstraction
//!
//! Pairing PDUs travel over the SMP fixed channel (CID 0x0006). The pairing
//! core only needs to send a PDU and to wait for the next PDU of a given
//! command code, so the channel is modelled by the [`SmpTransport`] trait.

use super::constants::*;
use super::pairing::PairingFailed;
use super::types::FailureReason;
use async_trait::async_trait;
use log::trace;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors reported by an SMP transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Link closed")]
    Closed,

    #[error("Malformed PDU: {0}")]
    Malformed(String),

    #[error("Unexpected PDU with command code 0x{0:02X}")]
    UnexpectedPdu(u8),

    #[error("Timed out waiting for the peer")]
    Timeout,

    #[error("Peer reported pairing failure: {0}")]
    RemoteFailure(FailureReason),
}

/// Channel carrying SMP PDUs to and from one peer
#[async_trait]
pub trait SmpTransport: Send {
    /// Send one PDU, command code first
    async fn send(&mut self, pdu: &[u8]) -> Result<(), LinkError>;

    /// Wait for the next PDU with the `expected` command code.
    ///
    /// Returns the whole PDU, command code first. A Pairing Failed PDU from
    /// the peer is reported as [`LinkError::RemoteFailure`].
    async fn receive(&mut self, expected: u8) -> Result<Vec<u8>, LinkError>;
}

/// In-memory SMP transport connecting two local endpoints.
///
/// Used to run both sides of a pairing inside one process, for example in
/// simulations and tests.
#[derive(Debug)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl ChannelTransport {
    /// Create two connected endpoints
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();

        (
            Self { tx: a_tx, rx: a_rx },
            Self { tx: b_tx, rx: b_rx },
        )
    }
}

#[async_trait]
impl SmpTransport for ChannelTransport {
    async fn send(&mut self, pdu: &[u8]) -> Result<(), LinkError> {
        trace!("SMP tx on CID 0x{:04X}: {}", SMP_CID, hex::encode(pdu));
        self.tx.send(pdu.to_vec()).map_err(|_| LinkError::Closed)
    }

    async fn receive(&mut self, expected: u8) -> Result<Vec<u8>, LinkError> {
        let pdu = self.rx.recv().await.ok_or(LinkError::Closed)?;
        trace!("SMP rx on CID 0x{:04X}: {}", SMP_CID, hex::encode(&pdu));

        match pdu.first() {
            None => Err(LinkError::Malformed("Empty SMP packet".into())),
            Some(&code) if code == expected => Ok(pdu),
            Some(&SMP_PAIRING_FAILED) => {
                let failed = PairingFailed::parse(&pdu)?;
                Err(LinkError::RemoteFailure(failed.reason))
            }
            Some(&code) => Err(LinkError::UnexpectedPdu(code)),
        }
    }
}
