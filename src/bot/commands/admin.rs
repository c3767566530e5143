//! Admin Discord commands - manual verification and code management.
//!
//! Every command here runs behind the `admin_only` check: the invoking user
//! must appear in `ADMIN_IDS`, and non-admins are rejected before any store
//! is touched.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::shop::PlanChoice, format_amount},
        core::{codes, orders},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use poise::serenity_prelude::Mentionable;

    /// Command check: only configured admin ids may proceed.
    pub async fn admin_only(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
        if ctx.data().settings.is_admin(ctx.author().id.get()) {
            Ok(true)
        } else {
            ctx.send(
                poise::CreateReply::default()
                    .content("❌ No permission!")
                    .ephemeral(true),
            )
            .await?;
            Ok(false)
        }
    }

    /// Manually verify an order, linking it to a Discord account.
    ///
    /// This is the path for direct payments whose buyer was unknown when the
    /// payment arrived.
    #[poise::command(slash_command, check = "admin_only")]
    pub async fn manual_verify(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order id"] order_id: String,
        #[description = "Discord account that paid"] discord_user: serenity::User,
    ) -> Result<()> {
        ctx.defer_ephemeral().await?;

        let admin_id = ctx.author().id.to_string();
        let identity = discord_user.id.to_string();
        match orders::verify(
            &ctx.data().shop,
            order_id.trim(),
            &admin_id,
            Some(&identity),
        )
        .await
        {
            Ok(order) => {
                ctx.say(format!(
                    "✅ Order {} verified!\n\
                     • Payer: `{}`\n\
                     • Amount: `{}`\n\
                     • Plan: `{}`\n\
                     • Discord: {}\n\
                     • Role assigned: ✅",
                    order.order_id,
                    order.payer_display_name.as_deref().unwrap_or("N/A"),
                    format_amount(order.amount),
                    order.plan_id,
                    discord_user.mention(),
                ))
                .await?;
            }
            Err(Error::OrderNotFound { .. }) => {
                ctx.say("❌ Order not found!").await?;
            }
            Err(Error::AlreadyVerified { .. }) => {
                ctx.say("❌ Order already verified!").await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Generate premium codes for a plan.
    #[poise::command(slash_command, check = "admin_only")]
    pub async fn generate_codes(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Plan"] plan: PlanChoice,
        #[description = "How many codes (max 50)"]
        #[min = 1]
        #[max = 50]
        count: Option<u32>,
    ) -> Result<()> {
        ctx.defer_ephemeral().await?;

        let plan = plan.plan();
        let issued = codes::issue_codes(
            &ctx.data().shop,
            plan,
            count.unwrap_or(1) as usize,
            &ctx.author().id.to_string(),
        )
        .await?;

        let lines: Vec<String> = issued
            .iter()
            .map(|code| format!("`{}` - {}", code.code, code.plan_id))
            .collect();
        for (index, chunk) in chunk_message(&lines.join("\n")).into_iter().enumerate() {
            if index == 0 {
                ctx.say(format!(
                    "✅ Generated {} {} codes:\n\n{chunk}",
                    issued.len(),
                    plan.id
                ))
                .await?;
            } else {
                ctx.say(chunk).await?;
            }
        }
        Ok(())
    }

    /// List codes that have not been redeemed yet.
    #[poise::command(slash_command, check = "admin_only")]
    pub async fn check_codes(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.defer_ephemeral().await?;

        let available = codes::available_codes(&ctx.data().shop).await;
        if available.is_empty() {
            ctx.say("ℹ️ No available codes").await?;
            return Ok(());
        }

        let mut lines = vec!["**Available codes:**".to_string()];
        for code in &available {
            lines.push(format!(
                "`{}` - {} (created by <@{}> on {})",
                code.code,
                code.plan_id,
                code.created_by,
                code.created_at.format("%Y-%m-%d %H:%M"),
            ));
        }
        for chunk in chunk_message(&lines.join("\n")) {
            ctx.say(chunk).await?;
        }
        Ok(())
    }

    /// Splits a reply into chunks under Discord's 2000-character message
    /// limit, breaking on line boundaries.
    pub(super) fn chunk_message(text: &str) -> Vec<String> {
        const LIMIT: usize = 1900;
        let mut chunks = Vec::new();
        let mut current = String::new();
        for line in text.lines() {
            if !current.is_empty() && current.len() + line.len() + 1 > LIMIT {
                chunks.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    use super::inner::chunk_message;

    #[test]
    fn short_messages_stay_in_one_chunk() {
        let chunks = chunk_message("line one\nline two");
        assert_eq!(chunks, vec!["line one\nline two".to_string()]);
    }

    #[test]
    fn long_listings_split_on_line_boundaries() {
        let lines: Vec<String> = (0..200)
            .map(|index| format!("`CODE{index:04}ABCDE` - 30d"))
            .collect();
        let chunks = chunk_message(&lines.join("\n"));

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 1900);
            assert!(!chunk.starts_with('\n'));
            assert!(!chunk.ends_with('\n'));
        }
        // Nothing is lost in the split.
        assert_eq!(chunks.join("\n"), lines.join("\n"));
    }

    #[test]
    fn empty_input_produces_no_chunks() {
        assert!(chunk_message("").is_empty());
    }
}
