//! Process entrypoint: wires settings, the stores, the payment API, and the
//! Discord bot together.

#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use premium_shop::errors::{Error, Result};
use premium_shop::{api, bot, config, core, outbound, store};
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (variables may also be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load runtime settings
    let settings = Arc::new(
        config::Settings::from_env()
            .inspect_err(|e| error!("Failed to load settings: {e}"))?,
    );
    info!("Settings loaded.");

    // 4. Check the plan catalog for overlapping price ranges
    core::plans::validate_catalog();

    // 5. Open the persisted stores
    let orders = store::OrderStore::open(&settings.orders_path)
        .await
        .inspect(|_| info!("Order store ready at {}", settings.orders_path.display()))
        .inspect_err(|e| error!("Failed to open order store: {e}"))?;
    let codes = store::CodeStore::open(&settings.codes_path)
        .await
        .inspect(|_| info!("Code store ready at {}", settings.codes_path.display()))
        .inspect_err(|e| error!("Failed to open code store: {e}"))?;

    // 6. Wire the shop and the outbound queue
    let (outbound_tx, outbound_rx) = outbound::channel();
    let shop = Arc::new(core::Shop::new(orders, codes, outbound_tx));

    // 7. Start the payment API in the background
    let api_state = api::AppState {
        shop: Arc::clone(&shop),
        settings: Arc::clone(&settings),
    };
    let http_port = settings.http_port;
    tokio::spawn(async move {
        if let Err(err) = api::run_server(api_state, http_port).await {
            error!("Payment API server exited: {err}");
        }
    });

    // 8. Run the bot; the token is read directly before use, not stored
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, settings, shop, outbound_rx).await
}
