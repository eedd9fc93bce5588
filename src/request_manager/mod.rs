//! # Request Manager Module
//!
//! The core of the bot: routes commands, callback button presses and inline
//! queries to the game source and the history, and turns every outcome into
//! an answer.
//!
//! This module is split into several submodules:
//! - `command`: Routing of chat commands
//! - `callback`: Routing of callback button presses
//! - `inline`: Routing of inline queries
//!
//! Every router absorbs its own failures: the answer it returns is always
//! displayable, errors only show up as the fixed messages of the formatter.

pub mod callback;
pub mod command;
pub mod inline;

use std::sync::Arc;

use crate::answer::{DisplayPayload, InlineAnswerList};
use crate::bgg::GameSource;
use crate::bgg_errors::BggError;
use crate::game::OffsetOutOfBound;
use crate::history::{HistoryError, HistoryStore};
use crate::output_formatter::{format_game, format_game_list};

/// Failures while processing a request, converted to answers by the routers
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    Bgg(BggError),
    History(HistoryError),
    /// A command needing an argument was sent without one
    MissingArgument,
    /// Callback data matching none of the known formats
    BadCallbackData(String),
    /// A page change leading outside the list; never expected
    ListNavigationOutOfBound(OffsetOutOfBound),
    /// The search of an old list no longer gives any result
    StaleListCallback,
    /// An inline offset that is not a position
    InvalidOffset(String),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Bgg(e) => write!(f, "BoardGameGeek error: {e}"),
            RequestError::History(e) => write!(f, "History error: {e}"),
            RequestError::MissingArgument => write!(f, "Missing command argument"),
            RequestError::BadCallbackData(data) => write!(f, "Bad callback data: {data}"),
            RequestError::ListNavigationOutOfBound(e) => write!(f, "List navigation: {e}"),
            RequestError::StaleListCallback => write!(f, "Stale list callback"),
            RequestError::InvalidOffset(offset) => write!(f, "Invalid inline offset: {offset}"),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Bgg(e) => Some(e),
            RequestError::History(e) => Some(e),
            RequestError::ListNavigationOutOfBound(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BggError> for RequestError {
    fn from(err: BggError) -> Self {
        RequestError::Bgg(err)
    }
}

impl From<HistoryError> for RequestError {
    fn from(err: HistoryError) -> Self {
        RequestError::History(err)
    }
}

/// Entry point for all the requests received by the bot
pub struct RequestManager {
    source: Arc<dyn GameSource>,
    history: Arc<HistoryStore>,
    inline_default: Arc<InlineAnswerList>,
}

impl RequestManager {
    pub fn new(
        source: Arc<dyn GameSource>,
        history: Arc<HistoryStore>,
        inline_default: InlineAnswerList,
    ) -> Self {
        Self {
            source,
            history,
            inline_default: Arc::new(inline_default),
        }
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// The answer to inline queries that cannot be answered otherwise
    pub fn inline_default(&self) -> &InlineAnswerList {
        &self.inline_default
    }

    /// Fetch a game, record it as the last game of the chat and format it
    async fn search_by_id(
        &self,
        id: &str,
        chat_id: i64,
        more: bool,
    ) -> Result<DisplayPayload, RequestError> {
        let game = self.source.fetch_by_id(id).await?;
        let payload = format_game(&game, more);
        self.history.record_game(chat_id, game, &payload.text);
        Ok(payload)
    }

    /// Search games by name and format the first page of results.
    ///
    /// A unique match is shown exactly as a search by its id would.
    async fn search_list(
        &self,
        name: &str,
        exact: bool,
        chat_id: i64,
    ) -> Result<DisplayPayload, RequestError> {
        let mut list = if exact {
            self.source.fetch_by_name_exact(name).await?
        } else {
            self.source.fetch_by_name(name).await?
        };
        list.original_search = name.to_string();

        match list.games() {
            [] => Err(BggError::NoResult.into()),
            [game] => {
                let id = game.id.clone();
                self.search_by_id(&id, chat_id, false).await
            }
            _ => {
                let payload = format_game_list(&list);
                self.history.record_game_list(chat_id, list);
                Ok(payload)
            }
        }
    }
}
