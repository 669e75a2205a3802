//! # Notify Module
//!
//! Best-effort real-time balance updates.
//!
//! After a successful credit the workflow pushes the new earnings
//! snapshot to the user's live session. Delivery is fire-and-forget:
//! a notifier failure is logged inside the workflow boundary and never
//! rolls back the credit or surfaces to the intake caller.

use crate::error::NotifyError;
use crate::model::{EarningsSnapshot, UserId};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Pushes earnings updates toward a real-time delivery layer
#[async_trait]
pub trait BalanceNotifier: Send + Sync {
    /// Deliver a fresh earnings snapshot for `user`
    async fn balance_changed(
        &self,
        user: UserId,
        snapshot: EarningsSnapshot,
    ) -> Result<(), NotifyError>;
}

/// A notifier that drops every update.
///
/// Useful for tests and deployments without a real-time layer.
#[derive(Debug, Default)]
pub struct NullNotifier;

#[async_trait]
impl BalanceNotifier for NullNotifier {
    async fn balance_changed(
        &self,
        _user: UserId,
        _snapshot: EarningsSnapshot,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// A balance update in flight to the delivery layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceUpdate {
    pub user: UserId,
    pub snapshot: EarningsSnapshot,
}

/// Notifier that forwards updates over a tokio channel.
///
/// The receiving half is typically drained by a websocket/push bridge.
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<BalanceUpdate>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver that drains it
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BalanceUpdate>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl BalanceNotifier for ChannelNotifier {
    async fn balance_changed(
        &self,
        user: UserId,
        snapshot: EarningsSnapshot,
    ) -> Result<(), NotifyError> {
        self.sender
            .send(BalanceUpdate { user, snapshot })
            .map_err(|_| NotifyError::ChannelClosed)
    }
}
