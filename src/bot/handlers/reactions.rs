//! Reaction-based payment verification.
//!
//! An admin reacting with ✅ on a verification embed in the configured
//! channel finalizes the embedded order. Only the order id is read back out
//! of the embed; the requester identity always comes from the stored order
//! record.

use crate::bot::{BotData, dispatcher};
use crate::core::orders;
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use tracing::{info, warn};

const VERIFY_EMOJI: &str = "✅";

/// Handles a reaction-added event on the verification channel.
pub async fn handle_reaction(
    ctx: &serenity::Context,
    reaction: &serenity::Reaction,
    data: &BotData,
) -> Result<()> {
    if reaction.channel_id.get() != data.settings.verification_channel_id {
        return Ok(());
    }
    if !reaction.emoji.unicode_eq(VERIFY_EMOJI) {
        return Ok(());
    }
    let Some(user_id) = reaction.user_id else {
        return Ok(());
    };
    if !data.settings.is_admin(user_id.get()) {
        return Ok(());
    }

    let message = reaction.message(&ctx.http).await?;
    let Some(order_id) = order_id_from_message(&message) else {
        return Ok(());
    };

    match orders::verify(&data.shop, &order_id, &user_id.to_string(), None).await {
        Ok(order) => {
            mark_message_verified(ctx, message, &user_id.to_string()).await?;
            info!(order_id = %order.order_id, admin = %user_id, "order verified via reaction");
        }
        Err(Error::AlreadyVerified { .. }) => {
            info!(order_id = %order_id, "duplicate verification reaction ignored");
        }
        Err(Error::UnknownRequester { .. }) => {
            warn!(order_id = %order_id, "verification deferred: requester unknown");
            message
                .reply(
                    &ctx.http,
                    format!(
                        "⚠️ Order `{order_id}` has no linked Discord account. \
                         Use `/manual_verify {order_id} <user>` once the buyer \
                         identifies themselves."
                    ),
                )
                .await?;
        }
        Err(Error::OrderNotFound { .. }) => {
            warn!(order_id = %order_id, "verification reaction for unknown order");
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

/// Extracts the order id from a verification embed's "Order ID" field.
/// Returns `None` for messages that are not verification embeds.
fn order_id_from_message(message: &serenity::Message) -> Option<String> {
    let embed = message.embeds.first()?;
    let title = embed.title.as_deref()?;
    if !(title.contains(dispatcher::VERIFICATION_TITLE_KEY)
        || title.contains(dispatcher::DIRECT_PAYMENT_TITLE_KEY))
    {
        return None;
    }
    embed
        .fields
        .iter()
        .find(|field| field.name == "Order ID")
        .map(|field| field.value.trim_matches('`').to_string())
}

/// Rewrites the embed to its verified state and clears the seed reaction.
async fn mark_message_verified(
    ctx: &serenity::Context,
    mut message: serenity::Message,
    admin_id: &str,
) -> Result<()> {
    let builder = message
        .embeds
        .first()
        .cloned()
        .map(serenity::CreateEmbed::from)
        .unwrap_or_default()
        .title("✅ Payment Verified")
        .colour(serenity::Colour::DARK_GREEN)
        .field("✅ Verified By", format!("<@{admin_id}>"), true)
        .field(
            "🕒 Verified At",
            format!("<t:{}:R>", chrono::Utc::now().timestamp()),
            true,
        );
    message
        .edit(&ctx.http, serenity::EditMessage::new().embed(builder))
        .await?;
    message.delete_reactions(&ctx.http).await?;
    Ok(())
}
