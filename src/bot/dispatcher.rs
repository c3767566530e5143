//! Outbound queue dispatcher - performs Discord side effects for the core.
//!
//! The core enqueues events and never blocks on delivery; this task drains
//! the queue for the life of the process. A failed embed, role grant, or DM
//! is logged and dropped - verification state is final once persisted, so
//! nothing here retries or rolls back.

use crate::bot::format_amount;
use crate::config::Settings;
use crate::entities::Order;
use crate::errors::Result;
use crate::outbound::{Outbound, OutboundReceiver};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Title of embeds announcing a bot-issued order awaiting confirmation.
pub(crate) const VERIFICATION_TITLE_KEY: &str = "Payment Verification Required";

/// Title of embeds announcing an unmatched in-game payment.
pub(crate) const DIRECT_PAYMENT_TITLE_KEY: &str = "Direct Payment Received";

const SETUP_GUIDE: &str = "Copy your HWID when the game starts and run \
    `/register <hwid>` in the authorization channel, then restart the game.";

/// Drains the outbound queue until the channel closes.
pub async fn run(http: Arc<serenity::Http>, settings: Arc<Settings>, mut outbound: OutboundReceiver) {
    while let Some(event) = outbound.recv().await {
        let result = match event {
            Outbound::VerificationRequested { order } => {
                post_verification_embed(&http, &settings, &order).await
            }
            Outbound::DirectPaymentReceived { order } => {
                post_direct_payment_embed(&http, &settings, &order).await
            }
            Outbound::AccessGranted { order } => grant_access(&http, &settings, &order).await,
        };
        if let Err(err) = result {
            error!("outbound delivery failed: {err}");
        }
    }
    info!("outbound queue closed; dispatcher exiting");
}

async fn post_verification_embed(
    http: &serenity::Http,
    settings: &Settings,
    order: &Order,
) -> Result<()> {
    let embed = serenity::CreateEmbed::default()
        .title(format!("🛒 {VERIFICATION_TITLE_KEY}"))
        .description("**React with ✅ to verify this payment**")
        .colour(serenity::Colour::ORANGE)
        .timestamp(serenity::Timestamp::now())
        .field(
            "Discord User",
            format!("<@{}>", order.requester_id),
            true,
        )
        .field(
            "Amount",
            format!("```{}```", format_amount(order.amount)),
            true,
        )
        .field("Plan", format!("```{}```", order.plan_id), true)
        .field("Order ID", format!("```{}```", order.order_id), false);
    send_with_seed_reaction(http, settings, embed).await?;
    info!(order_id = %order.order_id, "verification embed posted");
    Ok(())
}

async fn post_direct_payment_embed(
    http: &serenity::Http,
    settings: &Settings,
    order: &Order,
) -> Result<()> {
    let payer = order.payer_display_name.as_deref().unwrap_or("unknown");
    let embed = serenity::CreateEmbed::default()
        .title(format!("💰 {DIRECT_PAYMENT_TITLE_KEY}"))
        .description("**⚡ Payment detected in-game! React with ✅ to verify**")
        .colour(serenity::Colour::DARK_GREEN)
        .timestamp(serenity::Timestamp::now())
        .field("Payer", format!("```{payer}```"), true)
        .field(
            "Amount",
            format!("```{}```", format_amount(order.amount)),
            true,
        )
        .field("Detected Plan", format!("```{}```", order.plan_id), true)
        .field("Order ID", format!("```{}```", order.order_id), false)
        .field("Status", "🟡 **Needs Verification**", false)
        .field(
            "Action",
            "Ask the buyer for their Discord account and use `/manual_verify` to link it",
            false,
        );
    send_with_seed_reaction(http, settings, embed).await?;
    info!(order_id = %order.order_id, "direct payment embed posted");
    Ok(())
}

async fn send_with_seed_reaction(
    http: &serenity::Http,
    settings: &Settings,
    embed: serenity::CreateEmbed,
) -> Result<()> {
    let channel = serenity::ChannelId::new(settings.verification_channel_id);
    let message = channel
        .send_message(http, serenity::CreateMessage::new().embed(embed))
        .await?;
    message
        .react(http, serenity::ReactionType::Unicode("✅".to_string()))
        .await?;
    Ok(())
}

/// Grants the premium role and DMs the buyer. Each step logs and carries on
/// when it fails; the order's verified state already persisted.
async fn grant_access(http: &serenity::Http, settings: &Settings, order: &Order) -> Result<()> {
    let Ok(user_id) = order.requester_id.parse::<u64>() else {
        warn!(
            order_id = %order.order_id,
            requester = %order.requester_id,
            "cannot grant access without a Discord account"
        );
        return Ok(());
    };
    let guild = serenity::GuildId::new(settings.guild_id);
    let user = serenity::UserId::new(user_id);
    let role = serenity::RoleId::new(settings.premium_role_id);

    if let Err(err) = http
        .add_member_role(guild, user, role, Some("premium purchase verified"))
        .await
    {
        warn!(order_id = %order.order_id, user = user_id, "role grant failed: {err}");
    } else {
        info!(order_id = %order.order_id, user = user_id, "premium role granted");
    }

    let dm_text = if order.is_code_redemption {
        format!(
            "✅ Code accepted for `{}`! You now have premium access.\n\n{SETUP_GUIDE}",
            order.plan_id
        )
    } else {
        format!(
            "🎉 Your purchase is confirmed! You now have premium access.\n\n\
             **Order details:**\n\
             • Plan: {}\n\
             • Amount: {}\n\
             • Verified by: <@{}>\n\n{SETUP_GUIDE}",
            order.plan_id,
            format_amount(order.amount),
            order.verified_by.as_deref().unwrap_or("admin"),
        )
    };

    match user.create_dm_channel(http).await {
        Ok(dm) => {
            if let Err(err) = dm.say(http, dm_text).await {
                warn!(
                    order_id = %order.order_id,
                    user = user_id,
                    "DM delivery failed (user may have DMs disabled): {err}"
                );
            }
        }
        Err(err) => {
            warn!(order_id = %order.order_id, user = user_id, "could not open DM channel: {err}");
        }
    }
    Ok(())
}
