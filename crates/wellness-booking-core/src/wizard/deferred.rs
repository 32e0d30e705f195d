//! Deferred confirmation with simulated latency.
//!
//! A confirmation is validated up front, then waits out a simulated backend
//! round trip. The wait is bound to the wizard's lifecycle epoch: resetting
//! the wizard or leaving the review step bumps the epoch, which resolves any
//! pending wait as cancelled and makes its ticket unusable.

use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use super::{WizardError, WizardResult};

/// Epoch counter shared with pending confirmations.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    epoch: watch::Sender<u64>,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        let (epoch, _) = watch::channel(0);
        Self { epoch }
    }

    pub(crate) fn current(&self) -> u64 {
        *self.epoch.borrow()
    }

    /// Invalidate everything pending.
    pub(crate) fn advance(&self) {
        self.epoch.send_modify(|epoch| *epoch += 1);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<u64> {
        self.epoch.subscribe()
    }
}

/// Proof that a pending confirmation waited out its latency uncancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationTicket {
    pub(crate) epoch: u64,
}

/// A confirmation waiting on simulated latency.
#[derive(Debug)]
pub struct PendingConfirmation {
    epoch: u64,
    latency: Duration,
    updates: watch::Receiver<u64>,
}

impl PendingConfirmation {
    pub(crate) fn new(lifecycle: &Lifecycle, latency: Duration) -> Self {
        Self {
            epoch: lifecycle.current(),
            latency,
            updates: lifecycle.subscribe(),
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether the wizard has moved on since this confirmation began.
    pub fn is_cancelled(&self) -> bool {
        *self.updates.borrow() != self.epoch
    }

    /// Wait for the latency to elapse. Resolves early with
    /// [`WizardError::Cancelled`] if the wizard is reset, leaves the review
    /// step, or is dropped.
    pub async fn settle(mut self) -> WizardResult<ConfirmationTicket> {
        if self.is_cancelled() {
            return Err(WizardError::Cancelled);
        }

        tokio::select! {
            _ = tokio::time::sleep(self.latency) => {}
            _ = self.updates.changed() => {
                debug!("Pending confirmation for epoch {} cancelled", self.epoch);
                return Err(WizardError::Cancelled);
            }
        }

        if self.is_cancelled() {
            return Err(WizardError::Cancelled);
        }

        Ok(ConfirmationTicket { epoch: self.epoch })
    }
}
