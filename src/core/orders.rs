//! Order lifecycle - purchase, payment matching, verification, and
//! code-redemption orders.
//!
//! Orders move `pending -> paid -> verified`; `verified` is terminal. The
//! matcher pairs an inbound payment to a pending order by exact amount;
//! payments with no matching order become `paid` orders that need manual
//! identity linkage. All store mutations go through the store's update
//! operations, so transitions are atomic with respect to concurrent callers.

use crate::core::Shop;
use crate::core::plans::{self, Plan};
use crate::entities::{Order, OrderStatus, PlanDuration, RedeemCode, UNKNOWN_REQUESTER};
use crate::errors::{Error, Result};
use crate::outbound::Outbound;
use crate::store::CODE_ALPHABET;
use chrono::Utc;
use rand::Rng;
use tracing::info;

/// Creates a pending order for a bot-issued purchase with a freshly
/// generated price, and requests a verification embed.
pub async fn purchase(shop: &Shop, requester_id: &str, plan: &Plan) -> Result<Order> {
    let amount = plans::generate_price(plan);
    let order = shop
        .orders
        .insert(new_order(
            "order",
            requester_id,
            amount,
            plan.id,
            plan.duration,
        ))
        .await?;
    info!(
        order_id = %order.order_id,
        plan = plan.id,
        amount,
        "purchase order created"
    );
    shop.outbound.enqueue(Outbound::VerificationRequested {
        order: order.clone(),
    });
    Ok(order)
}

/// Creates a pending order from an externally supplied request (the
/// `create_order` endpoint), with the amount and plan given by the caller.
///
/// # Errors
/// Returns [`Error::UnknownPlan`] when `plan_id` is not in the catalog.
pub async fn create_order(
    shop: &Shop,
    requester_id: &str,
    amount: u64,
    plan_id: &str,
    duration: PlanDuration,
    is_code_redemption: bool,
) -> Result<Order> {
    if plans::find_plan(plan_id).is_none() {
        return Err(Error::UnknownPlan {
            plan_id: plan_id.to_string(),
        });
    }
    let mut order = new_order("order", requester_id, amount, plan_id, duration);
    order.is_code_redemption = is_code_redemption;
    let order = shop.orders.insert(order).await?;
    info!(
        order_id = %order.order_id,
        plan = plan_id,
        amount,
        "order created via API"
    );
    shop.outbound.enqueue(Outbound::VerificationRequested {
        order: order.clone(),
    });
    Ok(order)
}

/// Matches a payment notification against pending orders.
///
/// Candidates are orders in `pending` status that are not code redemptions
/// and whose amount equals the notified amount exactly; the first candidate
/// found is transitioned to `paid`, stamping `paid_at` and the payer's
/// in-game name. Returns `None` when no candidate exists.
pub async fn match_payment(shop: &Shop, amount: u64, payer_name: &str) -> Result<Option<Order>> {
    let now = Utc::now();
    let matched = shop
        .orders
        .update_first(
            |order| {
                order.status == OrderStatus::Pending
                    && !order.is_code_redemption
                    && order.amount == amount
            },
            |order| {
                order.status = OrderStatus::Paid;
                order.paid_at = Some(now);
                order.payer_display_name = Some(payer_name.to_string());
            },
        )
        .await?;
    if let Some(order) = &matched {
        info!(
            order_id = %order.order_id,
            amount,
            payer = payer_name,
            "payment matched to pending order"
        );
    }
    Ok(matched)
}

/// Records a payment that arrived with no matching order.
///
/// The plan is classified from the amount and the order starts directly in
/// `paid` status with an unknown requester; verification stays blocked until
/// an admin links a Discord account.
pub async fn direct_payment(shop: &Shop, payer_name: &str, amount: u64) -> Result<Order> {
    let (plan_id, duration) = match plans::classify(amount) {
        Some(plan) => (plan.id, plan.duration),
        None => (plans::UNKNOWN_PLAN, plans::UNKNOWN_PLAN_DURATION),
    };
    let now = Utc::now();
    let mut order = new_order("direct", UNKNOWN_REQUESTER, amount, plan_id, duration);
    order.status = OrderStatus::Paid;
    order.paid_at = Some(now);
    order.payer_display_name = Some(payer_name.to_string());
    order.needs_manual_verification = true;
    let order = shop.orders.insert(order).await?;
    info!(
        order_id = %order.order_id,
        payer = payer_name,
        amount,
        plan = %order.plan_id,
        "direct payment recorded"
    );
    shop.outbound.enqueue(Outbound::DirectPaymentReceived {
        order: order.clone(),
    });
    Ok(order)
}

/// Finalizes an order after admin confirmation.
///
/// `identity_override` attaches a Discord account to an order whose
/// requester is still unknown (the `/manual_verify` path). The transition is
/// persisted before the access-grant side effects are enqueued; downstream
/// failures never roll it back.
///
/// # Errors
/// Returns [`Error::AlreadyVerified`] for a terminal order and
/// [`Error::UnknownRequester`] when no identity can be resolved; both leave
/// the stored record unchanged.
pub async fn verify(
    shop: &Shop,
    order_id: &str,
    admin_id: &str,
    identity_override: Option<&str>,
) -> Result<Order> {
    let now = Utc::now();
    let verified = shop
        .orders
        .try_update(order_id, |order| {
            if order.status == OrderStatus::Verified {
                return Err(Error::AlreadyVerified {
                    order_id: order.order_id.clone(),
                });
            }
            let requester = match identity_override {
                Some(id) => id.to_string(),
                None if order.has_known_requester() => order.requester_id.clone(),
                None => {
                    return Err(Error::UnknownRequester {
                        order_id: order.order_id.clone(),
                    });
                }
            };
            order.requester_id = requester;
            // A pending order confirmed by hand passes through paid here.
            if order.paid_at.is_none() {
                order.paid_at = Some(now);
            }
            order.status = OrderStatus::Verified;
            order.verified_at = Some(now);
            order.verified_by = Some(admin_id.to_string());
            order.needs_manual_verification = false;
            Ok(())
        })
        .await?;
    info!(order_id = %verified.order_id, admin = admin_id, "order verified");
    shop.outbound.enqueue(Outbound::AccessGranted {
        order: verified.clone(),
    });
    Ok(verified)
}

/// Redeems a code: consumes it atomically and creates an order that is
/// already verified, then requests the access grant.
///
/// # Errors
/// Returns [`Error::InvalidCode`] when the code is unknown or already
/// redeemed; no order is created in that case.
pub async fn redeem(shop: &Shop, requester_id: &str, code: &str) -> Result<(RedeemCode, Order)> {
    let redeemed = shop.codes.redeem(code, requester_id).await?;
    let now = Utc::now();
    let mut order = new_order(
        "redeem",
        requester_id,
        0,
        &redeemed.plan_id,
        redeemed.duration,
    );
    order.status = OrderStatus::Verified;
    order.is_code_redemption = true;
    order.paid_at = Some(now);
    order.verified_at = Some(now);
    order.verified_by = Some(requester_id.to_string());
    order.code_used = Some(redeemed.code.clone());
    let order = shop.orders.insert(order).await?;
    info!(
        order_id = %order.order_id,
        code = %redeemed.code,
        plan = %order.plan_id,
        "code redeemed"
    );
    shop.outbound.enqueue(Outbound::AccessGranted {
        order: order.clone(),
    });
    Ok((redeemed, order))
}

fn new_order(
    prefix: &str,
    requester_id: &str,
    amount: u64,
    plan_id: &str,
    duration: PlanDuration,
) -> Order {
    Order {
        order_id: generate_order_id(prefix),
        requester_id: requester_id.to_string(),
        amount,
        plan_id: plan_id.to_string(),
        duration,
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

/// Generates an order id from a prefix, a coarse UTC timestamp, and a
/// random suffix. The suffix keeps ids unique when several orders are
/// created within the same second.
fn generate_order_id(prefix: &str) -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("{prefix}_{timestamp}_{suffix}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{sample_order, setup_shop};
    use std::collections::HashSet;

    #[tokio::test]
    async fn purchase_creates_a_pending_order_with_an_in_range_price() {
        let (shop, mut outbound, _dir) = setup_shop().await.unwrap();
        let plan = plans::find_plan("7d").unwrap();

        let order = purchase(&shop, "1000", plan).await.unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.plan_id, "7d");
        assert_eq!(order.duration, PlanDuration::Days(7));
        assert!((plan.min_price..=plan.max_price).contains(&order.amount));
        assert!(!order.is_code_redemption);
        assert!(order.paid_at.is_none());

        assert!(matches!(
            outbound.try_recv().unwrap(),
            Outbound::VerificationRequested { .. }
        ));
    }

    #[tokio::test]
    async fn rapid_order_creation_yields_unique_ids() {
        let (shop, _outbound, _dir) = setup_shop().await.unwrap();
        let plan = plans::find_plan("1d").unwrap();

        let mut ids = HashSet::new();
        for _ in 0..20 {
            let order = purchase(&shop, "1000", plan).await.unwrap();
            assert!(ids.insert(order.order_id), "duplicate order id generated");
        }
    }

    #[tokio::test]
    async fn seven_day_order_matches_its_exact_payment() {
        let (shop, _outbound, _dir) = setup_shop().await.unwrap();
        let order = create_order(
            &shop,
            "1000",
            49_500_000,
            "7d",
            PlanDuration::Days(7),
            false,
        )
        .await
        .unwrap();

        assert_eq!(plans::classify(49_500_000).unwrap().id, "7d");

        let matched = match_payment(&shop, 49_500_000, "Steve")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(matched.order_id, order.order_id);
        assert_eq!(matched.status, OrderStatus::Paid);
        assert_eq!(matched.payer_display_name.as_deref(), Some("Steve"));
        assert!(matched.paid_at.is_some());
    }

    #[tokio::test]
    async fn matcher_ignores_non_pending_and_code_redemption_orders() {
        let (shop, _outbound, _dir) = setup_shop().await.unwrap();

        let mut paid = sample_order("order_paid", 49_500_000);
        paid.status = OrderStatus::Paid;
        shop.orders.insert(paid).await.unwrap();

        let mut verified = sample_order("order_verified", 49_500_000);
        verified.status = OrderStatus::Verified;
        shop.orders.insert(verified).await.unwrap();

        let mut redemption = sample_order("order_redeem", 49_500_000);
        redemption.is_code_redemption = true;
        shop.orders.insert(redemption).await.unwrap();

        assert!(
            match_payment(&shop, 49_500_000, "Steve")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn matcher_requires_exact_amount_equality() {
        let (shop, _outbound, _dir) = setup_shop().await.unwrap();
        shop.orders
            .insert(sample_order("order_1", 49_500_000))
            .await
            .unwrap();

        assert!(
            match_payment(&shop, 49_500_001, "Steve")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            match_payment(&shop, 49_500_000, "Steve")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn unmatched_payment_becomes_a_manual_verification_order() {
        let (shop, mut outbound, _dir) = setup_shop().await.unwrap();

        let order = direct_payment(&shop, "Steve", 150_000_000).await.unwrap();

        assert_eq!(order.plan_id, plans::UNKNOWN_PLAN);
        assert_eq!(order.duration, PlanDuration::Days(1));
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.requester_id, UNKNOWN_REQUESTER);
        assert!(order.needs_manual_verification);
        assert_eq!(order.payer_display_name.as_deref(), Some("Steve"));

        assert!(matches!(
            outbound.try_recv().unwrap(),
            Outbound::DirectPaymentReceived { .. }
        ));
    }

    #[tokio::test]
    async fn direct_payment_in_a_plan_range_is_classified() {
        let (shop, _outbound, _dir) = setup_shop().await.unwrap();
        let order = direct_payment(&shop, "Steve", 119_500_000).await.unwrap();
        assert_eq!(order.plan_id, "30d");
        assert_eq!(order.duration, PlanDuration::Days(30));
    }

    #[tokio::test]
    async fn verify_finalizes_a_paid_order_and_grants_access() {
        let (shop, mut outbound, _dir) = setup_shop().await.unwrap();
        let mut paid = sample_order("order_1", 49_500_000);
        paid.status = OrderStatus::Paid;
        paid.paid_at = Some(Utc::now());
        shop.orders.insert(paid).await.unwrap();

        let verified = verify(&shop, "order_1", "42", None).await.unwrap();

        assert_eq!(verified.status, OrderStatus::Verified);
        assert_eq!(verified.verified_by.as_deref(), Some("42"));
        assert!(verified.verified_at.is_some());

        assert!(matches!(
            outbound.try_recv().unwrap(),
            Outbound::AccessGranted { .. }
        ));
    }

    #[tokio::test]
    async fn verify_stamps_paid_at_when_confirming_a_pending_order() {
        let (shop, _outbound, _dir) = setup_shop().await.unwrap();
        shop.orders
            .insert(sample_order("order_1", 49_500_000))
            .await
            .unwrap();

        let verified = verify(&shop, "order_1", "42", None).await.unwrap();
        assert!(verified.paid_at.is_some());
        assert_eq!(verified.status, OrderStatus::Verified);
    }

    #[tokio::test]
    async fn reverification_is_rejected_and_changes_nothing() {
        let (shop, _outbound, _dir) = setup_shop().await.unwrap();
        shop.orders
            .insert(sample_order("order_1", 49_500_000))
            .await
            .unwrap();
        let first = verify(&shop, "order_1", "42", None).await.unwrap();

        let second = verify(&shop, "order_1", "43", None).await;
        assert!(matches!(
            second.unwrap_err(),
            Error::AlreadyVerified { order_id } if order_id == "order_1"
        ));

        // The stored record still carries the first verification.
        let stored = shop.orders.get("order_1").await.unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn verify_without_an_identity_is_deferred() {
        let (shop, _outbound, _dir) = setup_shop().await.unwrap();
        let order = direct_payment(&shop, "Steve", 49_500_000).await.unwrap();

        let rejected = verify(&shop, &order.order_id, "42", None).await;
        assert!(matches!(
            rejected.unwrap_err(),
            Error::UnknownRequester { .. }
        ));

        // Still paid, untouched.
        let stored = shop.orders.get(&order.order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
        assert!(stored.needs_manual_verification);

        // Supplying the identity lets the verification through.
        let verified = verify(&shop, &order.order_id, "42", Some("1000"))
            .await
            .unwrap();
        assert_eq!(verified.requester_id, "1000");
        assert_eq!(verified.status, OrderStatus::Verified);
        assert!(!verified.needs_manual_verification);
    }

    #[tokio::test]
    async fn verify_unknown_order_is_not_found() {
        let (shop, _outbound, _dir) = setup_shop().await.unwrap();
        let result = verify(&shop, "missing", "42", None).await;
        assert!(matches!(result.unwrap_err(), Error::OrderNotFound { .. }));
    }

    #[tokio::test]
    async fn redeem_creates_a_verified_zero_amount_order() {
        let (shop, mut outbound, _dir) = setup_shop().await.unwrap();
        let issued = shop
            .codes
            .issue("30d", PlanDuration::Days(30), 1, "42")
            .await
            .unwrap();

        let (code, order) = redeem(&shop, "1000", &issued[0].code).await.unwrap();

        assert!(code.redeemed);
        assert_eq!(order.status, OrderStatus::Verified);
        assert_eq!(order.amount, 0);
        assert!(order.is_code_redemption);
        assert_eq!(order.plan_id, "30d");
        assert_eq!(order.code_used.as_deref(), Some(issued[0].code.as_str()));

        assert!(matches!(
            outbound.try_recv().unwrap(),
            Outbound::AccessGranted { .. }
        ));

        // Second redemption fails and creates no order.
        let again = redeem(&shop, "1001", &issued[0].code).await;
        assert!(matches!(again.unwrap_err(), Error::InvalidCode));
        assert_eq!(shop.orders.all().await.len(), 1);
    }

    #[tokio::test]
    async fn create_order_rejects_plans_outside_the_catalog() {
        let (shop, _outbound, _dir) = setup_shop().await.unwrap();
        let result = create_order(
            &shop,
            "1000",
            49_500_000,
            "lifetime",
            PlanDuration::Days(7),
            false,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::UnknownPlan { plan_id } if plan_id == "lifetime"
        ));
        assert!(shop.orders.all().await.is_empty());
    }
}
