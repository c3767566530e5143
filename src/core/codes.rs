//! Code issuing and listing operations.
//!
//! Redemption itself lives in [`crate::core::orders::redeem`], since it
//! creates an order as part of consuming the code.

use crate::core::Shop;
use crate::core::plans::Plan;
use crate::entities::RedeemCode;
use crate::errors::Result;
use tracing::info;

/// Issues a batch of codes for a plan. The store clamps the count to its
/// per-request maximum.
pub async fn issue_codes(
    shop: &Shop,
    plan: &Plan,
    count: usize,
    issuer: &str,
) -> Result<Vec<RedeemCode>> {
    let issued = shop
        .codes
        .issue(plan.id, plan.duration, count, issuer)
        .await?;
    info!(plan = plan.id, count = issued.len(), issuer, "codes issued");
    Ok(issued)
}

/// Lists codes that have not been redeemed yet.
pub async fn available_codes(shop: &Shop) -> Vec<RedeemCode> {
    shop.codes.available().await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::plans;
    use crate::test_utils::setup_shop;

    #[tokio::test]
    async fn issued_codes_carry_the_plan_and_issuer() {
        let (shop, _outbound, _dir) = setup_shop().await.unwrap();
        let plan = plans::find_plan("90d").unwrap();

        let issued = issue_codes(&shop, plan, 3, "42").await.unwrap();

        assert_eq!(issued.len(), 3);
        for code in &issued {
            assert_eq!(code.plan_id, "90d");
            assert_eq!(code.duration, plan.duration);
            assert_eq!(code.created_by, "42");
        }
        assert_eq!(available_codes(&shop).await.len(), 3);
    }
}
