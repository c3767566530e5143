//! Unified error types and result handling.

use thiserror::Error;

/// Every failure mode a shop operation can surface.
///
/// Boundary layers (Discord commands, HTTP handlers) convert these into
/// user-visible replies; nothing in the core panics or loses an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("order {order_id} not found")]
    OrderNotFound { order_id: String },

    #[error("order {order_id} is already verified")]
    AlreadyVerified { order_id: String },

    #[error("order {order_id} has no linked Discord account yet")]
    UnknownRequester { order_id: String },

    #[error("unknown plan: {plan_id}")]
    UnknownPlan { plan_id: String },

    #[error("invalid or already redeemed code")]
    InvalidCode,

    #[error("missing required fields: {}", fields.join(", "))]
    Validation { fields: Vec<String> },

    #[error("permission denied")]
    PermissionDenied,

    #[error("Discord API error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

/// Convenience `Result` type.
pub type Result<T> = std::result::Result<T, Error>;
