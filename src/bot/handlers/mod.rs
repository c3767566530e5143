//! Discord gateway event handlers.

/// Reaction-based payment verification
pub mod reactions;

use crate::bot::BotData;
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;

/// Routes gateway events to their handlers.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    if let serenity::FullEvent::ReactionAdd { add_reaction } = event {
        reactions::handle_reaction(ctx, add_reaction, data).await?;
    }
    Ok(())
}
