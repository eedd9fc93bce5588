//! Builds the inline answer sent when an inline query cannot be answered.
//!
//! Run it once before starting the bot; the result is written to
//! `INLINE_DEFAULT_PATH`.

use anyhow::{Context, Result};
use tracing::info;

use boardgamebot::answer::InlineAnswerList;
use boardgamebot::bgg::{BggClient, GameSource};
use boardgamebot::config::{BggConfig, BotConfig, DEFAULT_INLINE_GAME_ID, INLINE_CACHE_TIME_SECS};
use boardgamebot::history::persistence::save_inline_default;
use boardgamebot::localization::init_localization;
use boardgamebot::output_formatter::format_inline_game;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().init();
    init_localization()?;

    let path = BotConfig::inline_default_path_from_env()?;
    let client = BggClient::new(BggConfig::from_env()?)?;

    let game = client
        .fetch_by_id(DEFAULT_INLINE_GAME_ID)
        .await
        .with_context(|| format!("Failed to fetch game {DEFAULT_INLINE_GAME_ID}"))?;
    let inline_default =
        InlineAnswerList::new(INLINE_CACHE_TIME_SECS, true).with_answers(vec![format_inline_game(&game)]);

    save_inline_default(&path, &inline_default)?;
    info!(path = %path.display(), game = %game, "Default inline answer saved");
    Ok(())
}
