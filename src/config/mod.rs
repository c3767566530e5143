//! Configuration management - runtime settings loaded from environment
//! variables.
//!
//! Variables are read once at startup into an explicit [`Settings`] struct
//! that is passed to every layer; nothing reads the environment afterwards.

use crate::errors::{Error, Result};
use std::collections::HashSet;
use std::path::PathBuf;

/// Runtime settings shared by the bot and the payment API.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Discord user ids allowed to run admin commands and confirm payments
    pub admin_ids: HashSet<u64>,
    /// Role granted when an order verifies
    pub premium_role_id: u64,
    /// Channel that receives verification embeds
    pub verification_channel_id: u64,
    /// Guild the premium role lives in
    pub guild_id: u64,
    /// In-game account that receives payments
    pub payment_target: String,
    /// Path of the orders snapshot
    pub orders_path: PathBuf,
    /// Path of the redeem-codes snapshot
    pub codes_path: PathBuf,
    /// Listen port for the payment API
    pub http_port: u16,
}

impl Settings {
    /// Loads settings from the environment.
    ///
    /// `ADMIN_IDS`, `PREMIUM_ROLE_ID`, `VERIFICATION_CHANNEL_ID`, and
    /// `GUILD_ID` are required; the rest fall back to defaults.
    ///
    /// # Errors
    /// Returns a configuration error when a required variable is missing or
    /// fails to parse.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            admin_ids: parse_id_list(&require("ADMIN_IDS")?)?,
            premium_role_id: parse_id("PREMIUM_ROLE_ID")?,
            verification_channel_id: parse_id("VERIFICATION_CHANNEL_ID")?,
            guild_id: parse_id("GUILD_ID")?,
            payment_target: env_or("PAYMENT_TARGET", "number27"),
            orders_path: env_or("ORDERS_FILE", "orders.json").into(),
            codes_path: env_or("CODES_FILE", "redeem_codes.json").into(),
            http_port: parse_port()?,
        })
    }

    /// Whether `user_id` may run admin operations.
    #[must_use]
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| Error::Config {
        message: format!("{name} is not set"),
    })
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_id(name: &str) -> Result<u64> {
    let raw = require(name)?;
    parse_discord_id(raw.trim()).ok_or_else(|| Error::Config {
        message: format!("{name} is not a valid Discord id"),
    })
}

fn parse_id_list(raw: &str) -> Result<HashSet<u64>> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            parse_discord_id(entry).ok_or_else(|| Error::Config {
                message: format!("ADMIN_IDS entry {entry:?} is not a valid Discord id"),
            })
        })
        .collect::<Result<HashSet<u64>>>()?;
    if ids.is_empty() {
        return Err(Error::Config {
            message: "ADMIN_IDS contains no ids".to_string(),
        });
    }
    Ok(ids)
}

// Discord snowflakes are nonzero; serenity's id constructors reject zero.
fn parse_discord_id(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|id| *id != 0)
}

fn parse_port() -> Result<u16> {
    match std::env::var("PORT") {
        Ok(raw) => raw.trim().parse().map_err(|_| Error::Config {
            message: format!("PORT {raw:?} is not a valid port"),
        }),
        Err(_) => Ok(5000),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn id_list_parses_comma_separated_entries() {
        let ids = parse_id_list("1388619131984806039, 42,7").unwrap();
        assert_eq!(ids, HashSet::from([1_388_619_131_984_806_039, 42, 7]));
    }

    #[test]
    fn id_list_rejects_garbage_and_zero() {
        assert!(parse_id_list("42,notanid").is_err());
        assert!(parse_id_list("0").is_err());
        assert!(parse_id_list("").is_err());
        assert!(parse_id_list(" , ").is_err());
    }

    #[test]
    fn discord_ids_are_nonzero_integers() {
        assert_eq!(parse_discord_id("42"), Some(42));
        assert_eq!(parse_discord_id("0"), None);
        assert_eq!(parse_discord_id("-1"), None);
        assert_eq!(parse_discord_id("abc"), None);
    }
}
