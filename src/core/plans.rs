//! Plan catalog and price classification.
//!
//! The catalog is a fixed table; declaration order is classification
//! priority order, so where two ranges overlap the earlier plan wins.
//! Purchase prices are drawn uniformly from the plan's inclusive range,
//! which gives every purchase a near-unique amount the matcher can use to
//! tell simultaneous buyers of the same plan apart.

use crate::entities::{Perk, PlanDuration};
use rand::Rng;
use tracing::warn;

/// Sentinel plan id for payments that match no catalog range.
pub const UNKNOWN_PLAN: &str = "Unknown";

/// Duration granted when a payment cannot be classified.
pub const UNKNOWN_PLAN_DURATION: PlanDuration = PlanDuration::Days(1);

/// A premium-access tier with its inclusive price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    /// Catalog id, as shown to users and stored on orders
    pub id: &'static str,
    /// Inclusive lower price bound
    pub min_price: u64,
    /// Inclusive upper price bound
    pub max_price: u64,
    /// Access granted on verification
    pub duration: PlanDuration,
}

/// The fixed plan catalog.
pub const CATALOG: &[Plan] = &[
    Plan {
        id: "1d",
        min_price: 19_000_000,
        max_price: 20_000_000,
        duration: PlanDuration::Days(1),
    },
    Plan {
        id: "7d",
        min_price: 49_000_000,
        max_price: 50_000_000,
        duration: PlanDuration::Days(7),
    },
    Plan {
        id: "30d",
        min_price: 119_000_000,
        max_price: 120_000_000,
        duration: PlanDuration::Days(30),
    },
    Plan {
        id: "90d",
        min_price: 199_000_000,
        max_price: 200_000_000,
        duration: PlanDuration::Days(90),
    },
    Plan {
        id: "AntiAfk-Script",
        min_price: 99_000_000,
        max_price: 100_000_000,
        duration: PlanDuration::Perk(Perk::AntiAfk),
    },
    Plan {
        id: "Items-Script",
        min_price: 199_000_000,
        max_price: 200_000_000,
        duration: PlanDuration::Perk(Perk::Items),
    },
];

/// Looks up a plan by its catalog id.
#[must_use]
pub fn find_plan(id: &str) -> Option<&'static Plan> {
    CATALOG.iter().find(|plan| plan.id == id)
}

/// Classifies a paid amount: the first plan in catalog order whose inclusive
/// range contains it, or `None` for an unclassifiable amount.
#[must_use]
pub fn classify(amount: u64) -> Option<&'static Plan> {
    CATALOG
        .iter()
        .find(|plan| (plan.min_price..=plan.max_price).contains(&amount))
}

/// Draws a purchase price uniformly from the plan's inclusive range.
#[must_use]
pub fn generate_price(plan: &Plan) -> u64 {
    rand::thread_rng().gen_range(plan.min_price..=plan.max_price)
}

/// Returns every pair of distinct plans whose price ranges overlap.
#[must_use]
pub fn overlapping_pairs() -> Vec<(&'static str, &'static str)> {
    let mut pairs = Vec::new();
    for (index, first) in CATALOG.iter().enumerate() {
        for second in &CATALOG[index + 1..] {
            if first.min_price <= second.max_price && second.min_price <= first.max_price {
                pairs.push((first.id, second.id));
            }
        }
    }
    pairs
}

/// Checks the catalog for overlapping price ranges at startup.
///
/// Overlaps are warned about rather than rejected: the shipped catalog
/// contains one (`90d` and `Items-Script` share a range) and classification
/// resolves it by declaration order.
pub fn validate_catalog() {
    for (first, second) in overlapping_pairs() {
        warn!(
            first,
            second, "plan price ranges overlap; \"{first}\" wins classification"
        );
    }
}
