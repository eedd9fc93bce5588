use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use boardgamebot::bgg::{BggClient, GameSource};
use boardgamebot::bot;
use boardgamebot::config::BotConfig;
use boardgamebot::history::background::spawn_historian;
use boardgamebot::history::persistence::{load_history, load_inline_default, save_history};
use boardgamebot::input_parser::CommandParser;
use boardgamebot::localization::init_localization;
use boardgamebot::request_manager::RequestManager;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();
    info!("Starting Board Game Telegram Bot");

    init_localization().context("Failed to load localization")?;
    let config = BotConfig::from_env().context("Invalid configuration")?;

    let source: Arc<dyn GameSource> = Arc::new(BggClient::new(config.bgg.clone())?);
    let history = Arc::new(load_history(&config.history));
    let inline_default = load_inline_default(&config.inline_default_path);
    let manager = Arc::new(RequestManager::new(source, Arc::clone(&history), inline_default));

    let bot = Bot::new(config.bot_token.clone());

    // Commands may be addressed to the bot by username or by name
    let me = bot.get_me().await.context("Failed to get bot details")?;
    let parser = Arc::new(CommandParser::new(me.username(), &me.user.first_name)?);
    info!(username = %me.username(), "Bot initialized, starting dispatcher");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let historian = spawn_historian(Arc::clone(&history), config.history.clone(), shutdown_rx);

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(bot::message_handler))
        .branch(Update::filter_callback_query().endpoint(bot::callback_handler))
        .branch(Update::filter_inline_query().endpoint(bot::inline_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![manager, parser])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped, saving history");
    let _ = shutdown_tx.send(true);
    if let Err(e) = historian.await {
        error!(error = %e, "Historian task failed");
    }
    save_history(&history, &config.history);

    Ok(())
}
