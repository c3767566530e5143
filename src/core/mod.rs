//! Core business logic - framework-agnostic plan, order, and code
//! operations.
//!
//! Every operation takes the [`Shop`] aggregate explicitly; there is no
//! global state. The Discord layer and the HTTP API both call into this
//! module and only this module mutates the stores.

pub mod codes;
pub mod orders;
pub mod plans;

use crate::outbound::OutboundSender;
use crate::store::{CodeStore, OrderStore};

/// Shared shop state threaded through every core operation: the two
/// persisted stores plus the outbound side-effect queue.
#[derive(Debug)]
pub struct Shop {
    /// Persisted order collection
    pub orders: OrderStore,
    /// Persisted redeem-code collection
    pub codes: CodeStore,
    /// Queue of Discord side effects drained by the bot dispatcher
    pub outbound: OutboundSender,
}

impl Shop {
    /// Bundles the stores and the outbound queue into one handle.
    #[must_use]
    pub const fn new(orders: OrderStore, codes: CodeStore, outbound: OutboundSender) -> Self {
        Self {
            orders,
            codes,
            outbound,
        }
    }
}
