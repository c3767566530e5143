//! Route handlers for the payment API.
//!
//! Request bodies deserialize with every field optional and are validated
//! explicitly, so a missing field produces a 400 naming the field instead of
//! a framework-shaped deserialization error.

use super::AppState;
use super::error::ApiError;
use crate::core::orders;
use crate::entities::PlanDuration;
use crate::errors::Error;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

type ApiResult = std::result::Result<Response, ApiError>;

fn missing_fields(fields: Vec<&str>) -> ApiError {
    ApiError(Error::Validation {
        fields: fields.into_iter().map(str::to_string).collect(),
    })
}

fn success(body: Value) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "status": "not_found" }))).into_response()
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateOrderBody {
    requester_id: Option<String>,
    amount: Option<u64>,
    duration: Option<PlanDuration>,
    plan_id: Option<String>,
    is_code_redemption: Option<bool>,
}

/// `POST /create_order` - creates a pending order for an external caller.
pub(super) async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderBody>,
) -> ApiResult {
    let mut fields = Vec::new();
    if body.requester_id.is_none() {
        fields.push("requester_id");
    }
    if body.amount.is_none() {
        fields.push("amount");
    }
    if body.duration.is_none() {
        fields.push("duration");
    }
    if body.plan_id.is_none() {
        fields.push("plan_id");
    }
    if body.is_code_redemption.is_none() {
        fields.push("is_code_redemption");
    }

    match (
        body.requester_id,
        body.amount,
        body.duration,
        body.plan_id,
        body.is_code_redemption,
    ) {
        (
            Some(requester_id),
            Some(amount),
            Some(duration),
            Some(plan_id),
            Some(is_code_redemption),
        ) => {
            let order = orders::create_order(
                &state.shop,
                &requester_id,
                amount,
                &plan_id,
                duration,
                is_code_redemption,
            )
            .await?;
            Ok(success(json!({
                "status": "success",
                "order_id": order.order_id,
            })))
        }
        _ => Err(missing_fields(fields)),
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PaymentBody {
    payer_name: Option<String>,
    amount: Option<u64>,
    recipient: Option<String>,
}

impl PaymentBody {
    fn validate(self) -> Result<(String, u64, String), ApiError> {
        let mut fields = Vec::new();
        if self.payer_name.is_none() {
            fields.push("payer_name");
        }
        if self.amount.is_none() {
            fields.push("amount");
        }
        if self.recipient.is_none() {
            fields.push("recipient");
        }
        match (self.payer_name, self.amount, self.recipient) {
            (Some(payer_name), Some(amount), Some(recipient)) => {
                Ok((payer_name, amount, recipient))
            }
            _ => Err(missing_fields(fields)),
        }
    }
}

/// `POST /verify_payment` - runs the order matcher against a payment
/// notification. Answers 404 when no pending order matches, or when the
/// payment went to someone other than the configured target.
pub(super) async fn verify_payment(
    State(state): State<AppState>,
    Json(body): Json<PaymentBody>,
) -> ApiResult {
    let (payer_name, amount, recipient) = body.validate()?;

    if recipient != state.settings.payment_target {
        info!(recipient, amount, "payment to a different recipient ignored");
        return Ok(not_found());
    }

    match orders::match_payment(&state.shop, amount, &payer_name).await? {
        Some(order) => Ok(success(json!({
            "status": "success",
            "order_id": order.order_id,
        }))),
        None => Ok(not_found()),
    }
}

/// `POST /direct_payment` - records a payment with no matching order as a
/// paid order that needs manual identity linkage. Always succeeds once the
/// fields validate.
pub(super) async fn direct_payment(
    State(state): State<AppState>,
    Json(body): Json<PaymentBody>,
) -> ApiResult {
    let (payer_name, amount, _recipient) = body.validate()?;

    let order = orders::direct_payment(&state.shop, &payer_name, amount).await?;
    Ok(success(json!({
        "status": "success",
        "order_id": order.order_id,
        "plan": order.plan_id,
        "message": "Payment recorded, awaiting admin verification",
    })))
}

#[derive(Debug, Deserialize)]
pub(super) struct RedeemCodeBody {
    requester_id: Option<String>,
    code: Option<String>,
    // Required by the wire contract, but the stored code record is
    // authoritative for both.
    plan_id: Option<String>,
    duration: Option<PlanDuration>,
}

/// `POST /redeem_code` - consumes a code and creates a verified order.
pub(super) async fn redeem_code(
    State(state): State<AppState>,
    Json(body): Json<RedeemCodeBody>,
) -> ApiResult {
    let mut fields = Vec::new();
    if body.requester_id.is_none() {
        fields.push("requester_id");
    }
    if body.code.is_none() {
        fields.push("code");
    }
    if body.plan_id.is_none() {
        fields.push("plan_id");
    }
    if body.duration.is_none() {
        fields.push("duration");
    }

    match (body.requester_id, body.code) {
        (Some(requester_id), Some(code)) if fields.is_empty() => {
            let (redeemed, order) =
                orders::redeem(&state.shop, &requester_id, code.trim()).await?;
            Ok(success(json!({
                "status": "success",
                "order_id": order.order_id,
                "plan": redeemed.plan_id,
            })))
        }
        _ => Err(missing_fields(fields)),
    }
}

/// `GET /health` - liveness probe.
pub(super) async fn health() -> Response {
    success(json!({ "status": "healthy", "service": "premium-shop payment API" }))
}
