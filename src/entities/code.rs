//! Redeem-code record - a single-use token granting a plan without payment.

use super::order::PlanDuration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A redeemable premium code. Redemption fields are set exactly once; a
/// redeemed code can never be un-redeemed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedeemCode {
    /// The token itself, drawn from the unambiguous code alphabet
    pub code: String,
    /// Catalog plan id this code grants
    pub plan_id: String,
    /// Access granted on redemption
    pub duration: PlanDuration,
    /// Issue time
    pub created_at: DateTime<Utc>,
    /// Discord user id of the issuing admin
    pub created_by: String,
    /// Whether the code has been consumed
    #[serde(default)]
    pub redeemed: bool,
    /// Discord user id of the redeemer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeemed_by: Option<String>,
    /// Redemption time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeemed_at: Option<DateTime<Utc>>,
}
