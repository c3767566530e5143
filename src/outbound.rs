//! Outbound side-effect queue.
//!
//! Core operations enqueue Discord side effects (verification embeds, role
//! grants, DMs) on this channel and return immediately; the bot's dispatcher
//! drains it. State transitions are final once persisted - a dropped or
//! failed event is logged, never retried, and never rolls anything back.

use crate::entities::Order;
use tokio::sync::mpsc;
use tracing::warn;

/// Side effects the Discord layer performs on behalf of the core.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// A bot-issued order awaits admin confirmation in the verification
    /// channel
    VerificationRequested {
        /// The freshly created pending order
        order: Order,
    },
    /// A payment arrived with no matching order; admins must link a Discord
    /// account before it can verify
    DirectPaymentReceived {
        /// The paid order awaiting manual identity linkage
        order: Order,
    },
    /// A verified order: grant the premium role and notify the buyer
    AccessGranted {
        /// The verified order, requester identity already resolved
        order: Order,
    },
}

/// Receiving half of the queue, drained by the bot dispatcher.
pub type OutboundReceiver = mpsc::UnboundedReceiver<Outbound>;

/// Sending half of the queue, held by the shop.
#[derive(Debug, Clone)]
pub struct OutboundSender(mpsc::UnboundedSender<Outbound>);

impl OutboundSender {
    /// Enqueues an event. A closed queue is logged and the event dropped;
    /// enqueueing never fails the operation that triggered it.
    pub fn enqueue(&self, event: Outbound) {
        if self.0.send(event).is_err() {
            warn!("outbound queue closed; event dropped");
        }
    }
}

/// Creates the queue connecting the core to the Discord dispatcher.
#[must_use]
pub fn channel() -> (OutboundSender, OutboundReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (OutboundSender(tx), rx)
}
