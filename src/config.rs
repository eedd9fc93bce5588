//! # Configuration Module
//!
//! This module defines configuration structures for the bot, including
//! BoardGameGeek connection settings, history persistence and answer limits.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// Constants for BoardGameGeek access
pub const DEFAULT_API_PATH: &str = "https://boardgamegeek.com/xmlapi2/";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const ATTEMPTS_LIMIT: u32 = 3;
pub const BOARDGAMEGEEK_BASE_ADDRESS: &str = "https://boardgamegeek.com/boardgame/";

// Constants for answers
pub const LIST_PAGE_SIZE: usize = 10;
pub const INLINE_LIST_PAGE_SIZE: usize = 4;
/// Queries shorter than this (in characters) are searched by exact name
pub const INLINE_EXACT_QUERY_THRESHOLD: usize = 5;
pub const INLINE_CACHE_TIME_SECS: u32 = 3600;
pub const RECENT_GAMES_CACHE_TIME_SECS: u32 = 5;
pub const DEFAULT_INLINE_GAME_ID: &str = "145654";

// Constants for history
pub const RECENT_GAMES_LIMIT: usize = 5;
pub const HISTORY_SAVING_INTERVAL_SECS: u64 = 300;
pub const HISTORY_WARNING_SIZE: u64 = 256 * 1024 * 1024; // 256MB
pub const CHAT_HISTORY_PATH: &str = "resources/chat_history.json";
pub const USER_HISTORY_PATH: &str = "resources/user_history.json";
pub const INLINE_DEFAULT_PATH: &str = "resources/inline_default.json";

/// Connection settings for the BoardGameGeek XML API
#[derive(Debug, Clone)]
pub struct BggConfig {
    /// Base path of the XML API 2, ending with a slash
    pub api_path: String,
    /// Timeout for a single HTTP request in seconds
    pub request_timeout_secs: u64,
    /// Maximum number of attempts for a request that fails with a recoverable error
    pub attempts_limit: u32,
}

impl Default for BggConfig {
    fn default() -> Self {
        Self {
            api_path: DEFAULT_API_PATH.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            attempts_limit: ATTEMPTS_LIMIT,
        }
    }
}

/// History persistence settings
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Snapshot file for the chat history table
    pub chat_history_path: PathBuf,
    /// Snapshot file for the user to private chat table
    pub user_history_path: PathBuf,
    /// Interval between two background snapshots in seconds
    pub saving_interval_secs: u64,
    /// Maximum number of games kept in the recent games list of a chat
    pub recent_games_limit: usize,
    /// Snapshot size in bytes above which an error is logged
    pub warning_size: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            chat_history_path: PathBuf::from(CHAT_HISTORY_PATH),
            user_history_path: PathBuf::from(USER_HISTORY_PATH),
            saving_interval_secs: HISTORY_SAVING_INTERVAL_SECS,
            recent_games_limit: RECENT_GAMES_LIMIT,
            warning_size: HISTORY_WARNING_SIZE,
        }
    }
}

/// Complete bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub bgg: BggConfig,
    pub history: HistoryConfig,
    /// Precomputed inline answer used whenever an inline query fails
    pub inline_default_path: PathBuf,
}

impl BotConfig {
    /// Build the configuration from environment variables.
    ///
    /// Only `TELEGRAM_BOT_TOKEN` is required, every other value falls back
    /// to its default.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
        Ok(Self {
            bot_token,
            bgg: BggConfig::from_env()?,
            history: HistoryConfig::from_env()?,
            inline_default_path: Self::inline_default_path_from_env()?,
        })
    }

    /// Path of the default inline answer, readable without a bot token
    pub fn inline_default_path_from_env() -> Result<PathBuf> {
        env_or("INLINE_DEFAULT_PATH", PathBuf::from(INLINE_DEFAULT_PATH))
    }
}

impl BggConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            api_path: env_or("BGG_API_PATH", defaults.api_path)?,
            request_timeout_secs: env_or("BGG_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            attempts_limit: env_or("BGG_ATTEMPTS_LIMIT", defaults.attempts_limit)?,
        })
    }
}

impl HistoryConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            chat_history_path: env_or("CHAT_HISTORY_PATH", defaults.chat_history_path)?,
            user_history_path: env_or("USER_HISTORY_PATH", defaults.user_history_path)?,
            saving_interval_secs: env_or(
                "HISTORY_SAVING_INTERVAL_SECS",
                defaults.saving_interval_secs,
            )?,
            ..defaults
        })
    }
}

/// Read `key` from the environment, parsing it, or return `default` when unset
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {key}: {e}")),
        Err(_) => Ok(default),
    }
}
