//! Shared test utilities.
//!
//! Helpers for setting up temp-directory-backed shops and building sample
//! records with sensible defaults.

use crate::core::Shop;
use crate::entities::{Order, OrderStatus, PlanDuration};
use crate::errors::Result;
use crate::outbound::{self, OutboundReceiver};
use crate::store::{CodeStore, OrderStore};
use chrono::Utc;
use tempfile::TempDir;

/// Creates a shop backed by stores in a fresh temp directory.
///
/// Returns the outbound receiver so tests can assert on enqueued side
/// effects, and the temp-dir guard so the snapshot files outlive the test
/// body.
pub async fn setup_shop() -> Result<(Shop, OutboundReceiver, TempDir)> {
    let dir = TempDir::new()?;
    let orders = OrderStore::open(dir.path().join("orders.json")).await?;
    let codes = CodeStore::open(dir.path().join("redeem_codes.json")).await?;
    let (tx, rx) = outbound::channel();
    Ok((Shop::new(orders, codes, tx), rx, dir))
}

/// Builds a pending `7d` order with sensible defaults.
#[must_use]
pub fn sample_order(order_id: &str, amount: u64) -> Order {
    Order {
        order_id: order_id.to_string(),
        requester_id: "1000".to_string(),
        amount,
        plan_id: "7d".to_string(),
        duration: PlanDuration::Days(7),
        status: OrderStatus::Pending,
        is_code_redemption: false,
        created_at: Utc::now(),
        paid_at: None,
        verified_at: None,
        verified_by: None,
        payer_display_name: None,
        needs_manual_verification: false,
        code_used: None,
    }
}
