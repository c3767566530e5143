//! Order record - one purchase or redemption attempt and its verification
//! progress.
//!
//! Orders are created once, mutated in place on each lifecycle transition,
//! and never deleted; the store keeps the full history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel requester id for payments whose Discord account is not known yet.
pub const UNKNOWN_REQUESTER: &str = "unknown";

/// Access granted by a plan: a day count or a symbolic perk.
///
/// Serialized untagged, so day counts persist as numbers and perks as their
/// lowercase names (`"antiafk"`, `"items"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanDuration {
    /// Timed access measured in days
    Days(u32),
    /// Perk access with no expiry
    Perk(Perk),
}

/// Non-timed perks sold alongside the timed plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perk {
    /// Anti-AFK script access
    AntiAfk,
    /// Item script access
    Items,
}

/// Order lifecycle status. Transitions are linear
/// (`pending -> paid -> verified`) and `verified` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting the in-game payment
    Pending,
    /// Payment observed, awaiting admin confirmation
    Paid,
    /// Confirmed by an admin (or created verified by a code redemption)
    Verified,
}

/// A purchase or redemption attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique id: prefix, coarse UTC timestamp, random suffix
    pub order_id: String,
    /// Discord user id as a string, or [`UNKNOWN_REQUESTER`]
    pub requester_id: String,
    /// Payment amount in in-game currency; 0 for code redemptions
    pub amount: u64,
    /// Catalog plan id, or the `Unknown` sentinel for unclassified payments
    pub plan_id: String,
    /// Access granted once the order verifies
    pub duration: PlanDuration,
    /// Lifecycle status
    pub status: OrderStatus,
    /// True when this order was created by redeeming a code
    pub is_code_redemption: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Set when the payment is matched or manually confirmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    /// Set on verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    /// Admin (or redeemer) that finalized the order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    /// In-game name of the payer, once a payment notification supplies it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_display_name: Option<String>,
    /// True when the order came from an unmatched payment and still needs an
    /// admin to link a Discord account
    #[serde(default)]
    pub needs_manual_verification: bool,
    /// The redeemed code, for code-redemption orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_used: Option<String>,
}

impl Order {
    /// Whether the requester's Discord account is known.
    #[must_use]
    pub fn has_known_requester(&self) -> bool {
        self.requester_id != UNKNOWN_REQUESTER
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn plan_duration_serializes_days_as_numbers_and_perks_as_names() {
        assert_eq!(
            serde_json::to_string(&PlanDuration::Days(30)).unwrap(),
            "30"
        );
        assert_eq!(
            serde_json::to_string(&PlanDuration::Perk(Perk::AntiAfk)).unwrap(),
            "\"antiafk\""
        );
        assert_eq!(
            serde_json::from_str::<PlanDuration>("\"items\"").unwrap(),
            PlanDuration::Perk(Perk::Items)
        );
        assert_eq!(
            serde_json::from_str::<PlanDuration>("7").unwrap(),
            PlanDuration::Days(7)
        );
    }

    #[test]
    fn order_status_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"verified\"").unwrap(),
            OrderStatus::Verified
        );
    }
}
