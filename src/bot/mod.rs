//! Bot layer - Discord-specific interface and event wiring.
//!
//! This module provides the Discord interface for the shop: slash commands,
//! the reaction-based verification handler, and the outbound dispatcher that
//! performs side effects (embeds, role grants, DMs) on behalf of the core.

/// Discord command implementations (shop, admin, general)
pub mod commands;
/// Outbound queue dispatcher - embeds, role grants, DMs
pub mod dispatcher;
/// Discord gateway event handlers (reaction verification)
pub mod handlers;

use crate::config::Settings;
use crate::core::Shop;
use crate::errors::{Error, Result};
use crate::outbound::OutboundReceiver;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
pub struct BotData {
    /// Shop state: the stores and the outbound queue
    pub shop: Arc<Shop>,
    /// Runtime settings: admin ids, channel/role/guild ids, payment target
    pub settings: Arc<Settings>,
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            panic!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework, spawns the outbound dispatcher, and runs the
/// Discord client until shutdown.
#[instrument(skip_all)]
pub async fn run_bot(
    token: String,
    settings: Arc<Settings>,
    shop: Arc<Shop>,
    outbound: OutboundReceiver,
) -> Result<()> {
    let dispatcher_settings = Arc::clone(&settings);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::purchase(),
                commands::redeem(),
                commands::manual_verify(),
                commands::generate_codes(),
                commands::check_codes(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData { shop, settings })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::DIRECT_MESSAGES;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await?;

    tokio::spawn(dispatcher::run(
        Arc::clone(&client.http),
        dispatcher_settings,
        outbound,
    ));

    info!("Starting bot client...");
    client.start().await.map_err(Into::into)
}

/// Formats an in-game amount with thousands separators, matching the
/// `/pay` amounts players see in game.
#[must_use]
pub(crate) fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(ch);
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_format_with_thousands_separators() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1_000), "1,000");
        assert_eq!(format_amount(49_500_000), "49,500,000");
        assert_eq!(format_amount(200_000_000), "200,000,000");
    }
}
