//! BoardGameGeek data source
//!
//! This module is split into several submodules:
//! - `http`: HTTP client for the XML API 2 with bounded retries
//! - `xml_parser`: Parsing of `thing` and `search` responses

pub mod http;
pub mod xml_parser;

use async_trait::async_trait;

use crate::bgg_errors::BggError;
use crate::game::{Game, GameList};

pub use http::BggClient;

/// A source of board game data
///
/// Searches by name return lists whose `original_search` is the searched text.
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Fetch the full details of a game
    async fn fetch_by_id(&self, id: &str) -> Result<Game, BggError>;

    /// Fetch the games whose name contains `name`
    async fn fetch_by_name(&self, name: &str) -> Result<GameList, BggError>;

    /// Fetch the games whose name is exactly `name`
    async fn fetch_by_name_exact(&self, name: &str) -> Result<GameList, BggError>;
}
