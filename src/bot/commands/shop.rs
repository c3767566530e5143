//! Shop Discord commands - purchasing premium access and redeeming codes.
//!
//! Both commands reply ephemerally so payment amounts and codes stay
//! between the bot and the buyer.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, format_amount},
        core::{orders, plans},
        errors::{Error, Result},
    };

    /// Plan selector offered by `/purchase` and `/generate_codes`.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum PlanChoice {
        #[name = "1d"]
        OneDay,
        #[name = "7d"]
        SevenDays,
        #[name = "30d"]
        ThirtyDays,
        #[name = "90d"]
        NinetyDays,
        #[name = "AntiAfk-Script"]
        AntiAfkScript,
        #[name = "Items-Script"]
        ItemsScript,
    }

    impl PlanChoice {
        /// Resolves the selected choice to its catalog entry.
        pub fn plan(self) -> &'static plans::Plan {
            let id = match self {
                Self::OneDay => "1d",
                Self::SevenDays => "7d",
                Self::ThirtyDays => "30d",
                Self::NinetyDays => "90d",
                Self::AntiAfkScript => "AntiAfk-Script",
                Self::ItemsScript => "Items-Script",
            };
            // The selector mirrors the catalog ids, so the lookup cannot
            // miss; the fallback keeps the signature panic-free.
            plans::find_plan(id).unwrap_or(&plans::CATALOG[0])
        }
    }

    /// Purchase premium access: creates a pending order and replies with
    /// payment instructions.
    #[poise::command(slash_command)]
    pub async fn purchase(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Premium plan"] plan: PlanChoice,
    ) -> Result<()> {
        ctx.defer_ephemeral().await?;

        let plan = plan.plan();
        let order = orders::purchase(
            &ctx.data().shop,
            &ctx.author().id.to_string(),
            plan,
        )
        .await?;

        let target = &ctx.data().settings.payment_target;
        let instructions = format!(
            "💎 Payment instructions:\n\n\
             Send `{amount}` to `{target}` in game\n\
             Command: ```/pay {target} {raw_amount}```\n\n\
             Your order is checked automatically once the payment arrives - \
             no need to ping the admins.",
            amount = format_amount(order.amount),
            raw_amount = order.amount,
        );
        ctx.say(instructions).await?;
        Ok(())
    }

    /// Redeem a premium code.
    #[poise::command(slash_command)]
    pub async fn redeem(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Premium code"] code: String,
    ) -> Result<()> {
        ctx.defer_ephemeral().await?;

        match orders::redeem(
            &ctx.data().shop,
            &ctx.author().id.to_string(),
            code.trim(),
        )
        .await
        {
            Ok((redeemed, _order)) => {
                ctx.say(format!(
                    "✅ Code accepted for plan `{}` - premium access granted. \
                     Check your DMs for the setup guide.",
                    redeemed.plan_id
                ))
                .await?;
            }
            Err(Error::InvalidCode) => {
                ctx.say("❌ Invalid or already redeemed code!").await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
