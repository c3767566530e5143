//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't touch the stores and
//! provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Premium Shop Help**\n\
        Here is a summary of all available commands.\n\n\
        **Shop Commands**\n\
        • `/purchase <plan>` - Buy premium access; you'll get payment instructions.\n\
        • `/redeem <code>` - Redeem a premium code.\n\n\
        **Admin Commands**\n\
        • `/manual_verify <order_id> <user>` - Verify an order and link its Discord account.\n\
        • `/generate_codes <plan> [count]` - Issue premium codes (max 50 per call).\n\
        • `/check_codes` - List unredeemed codes.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Payments are confirmed by the admins reacting in the verification channel.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
