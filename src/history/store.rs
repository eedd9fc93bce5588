//! Shared tables of chat histories and user private chats

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

use super::{ChatHistory, HistoryError};
use crate::answer::InlineAnswer;
use crate::game::{Game, GameList};

/// Chat histories keyed by chat id, and the private chat of every user
///
/// Entries are created on first use and never removed. Concurrent updates to
/// the same chat are not serialized beyond a single operation: the last
/// write wins.
#[derive(Debug)]
pub struct HistoryStore {
    chats: RwLock<HashMap<i64, ChatHistory>>,
    user_private_chats: RwLock<HashMap<u64, i64>>,
    recent_games_limit: usize,
}

impl HistoryStore {
    pub fn new(recent_games_limit: usize) -> Self {
        Self::from_tables(HashMap::new(), HashMap::new(), recent_games_limit)
    }

    /// Build a store from previously saved tables
    pub fn from_tables(
        chats: HashMap<i64, ChatHistory>,
        user_private_chats: HashMap<u64, i64>,
        recent_games_limit: usize,
    ) -> Self {
        Self {
            chats: RwLock::new(chats),
            user_private_chats: RwLock::new(user_private_chats),
            recent_games_limit,
        }
    }

    /// The history of a chat, created empty if the chat is new
    pub fn get_or_create(&self, chat_id: i64) -> ChatHistory {
        self.chats.write().entry(chat_id).or_default().clone()
    }

    pub fn get(&self, chat_id: i64) -> Result<ChatHistory, HistoryError> {
        self.chats
            .read()
            .get(&chat_id)
            .cloned()
            .ok_or(HistoryError::ChatHistoryNotFound)
    }

    /// Record the last game displayed in a chat and add it to its recent games
    pub fn record_game(&self, chat_id: i64, game: Game, formatted_answer: &str) {
        debug!(chat_id, game_id = %game.id, "Recording last game");
        self.chats.write().entry(chat_id).or_default().set_last_game(
            game,
            formatted_answer,
            self.recent_games_limit,
        );
    }

    pub fn record_game_list(&self, chat_id: i64, game_list: GameList) {
        debug!(chat_id, games = game_list.len(), "Recording last game list");
        self.chats
            .write()
            .entry(chat_id)
            .or_default()
            .set_last_game_list(game_list);
    }

    /// Replace the last game list of a chat after a page change.
    ///
    /// Unlike [`HistoryStore::record_game_list`], the entry waiting for a
    /// message id is left untouched.
    pub fn update_last_game_list(&self, chat_id: i64, game_list: GameList) {
        match self.chats.write().get_mut(&chat_id) {
            Some(history) => history.last_game_list = Some(game_list),
            None => debug!(chat_id, "No history to update the game list of"),
        }
    }

    /// Attach the id of the message just sent to whatever was recorded last in the chat
    pub fn attach_message_id(&self, chat_id: i64, msg_id: i32) {
        match self.chats.write().get_mut(&chat_id) {
            Some(history) => history.attach_message_id(msg_id),
            None => debug!(chat_id, msg_id, "No history to attach the message id to"),
        }
    }

    /// Remember the private chat of a user; the first chat seen is kept forever
    pub fn bind_user_to_chat(&self, user_id: u64, chat_id: i64) {
        let mut users = self.user_private_chats.write();
        if !users.contains_key(&user_id) {
            users.insert(user_id, chat_id);
            info!(user_id, chat_id, "User has a new private chat");
        }
    }

    pub fn private_chat(&self, user_id: u64) -> Option<i64> {
        self.user_private_chats.read().get(&user_id).copied()
    }

    pub fn last_game(&self, chat_id: i64) -> Result<Game, HistoryError> {
        self.get(chat_id)?
            .last_game
            .ok_or(HistoryError::MissingFromChatHistory)
    }

    pub fn last_game_list(&self, chat_id: i64) -> Result<GameList, HistoryError> {
        self.get(chat_id)?
            .last_game_list
            .ok_or(HistoryError::MissingFromChatHistory)
    }

    /// The identifier of the game at a 1-based `position` in the last list of a chat
    pub fn listed_game_id(&self, chat_id: i64, position: &str) -> Result<String, HistoryError> {
        let chats = self.chats.read();
        let history = chats.get(&chat_id).ok_or(HistoryError::ChatHistoryNotFound)?;
        history.listed_game_id(position).map(str::to_string)
    }

    /// The recent games of the private chat of a user
    pub fn recent_games_of_user(&self, user_id: u64) -> Result<Vec<InlineAnswer>, HistoryError> {
        let chat_id = self
            .private_chat(user_id)
            .ok_or(HistoryError::ChatHistoryNotFound)?;
        let chats = self.chats.read();
        let history = chats.get(&chat_id).ok_or(HistoryError::ChatHistoryNotFound)?;
        if history.recent_games().is_empty() {
            return Err(HistoryError::MissingFromChatHistory);
        }
        Ok(history.recent_games().to_vec())
    }

    /// Copies of both tables, for saving
    pub fn snapshot(&self) -> (HashMap<i64, ChatHistory>, HashMap<u64, i64>) {
        (
            self.chats.read().clone(),
            self.user_private_chats.read().clone(),
        )
    }

    pub fn chat_count(&self) -> usize {
        self.chats.read().len()
    }

    pub fn recent_games_limit(&self) -> usize {
        self.recent_games_limit
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(crate::config::RECENT_GAMES_LIMIT)
    }
}
