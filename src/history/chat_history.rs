//! The history of a single chat

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::HistoryError;
use crate::answer::InlineAnswer;
use crate::game::{Game, GameList};
use crate::output_formatter::title_case;

/// The entry a message identifier must be attached to once the answer is sent
///
/// The identifier of a message is only known after sending it, so the history
/// remembers which of its entries produced the last answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingTarget {
    #[default]
    None,
    LastGame,
    LastGameList,
}

/// Everything remembered about a chat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatHistory {
    pub last_game: Option<Game>,
    pub last_game_list: Option<GameList>,
    /// Most recent first, without duplicates
    recent_games: Vec<InlineAnswer>,
    pending_target: PendingTarget,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the last game displayed in the chat, also adding it to the recent games
    pub fn set_last_game(&mut self, game: Game, formatted_answer: &str, recent_limit: usize) {
        self.add_recent_game(&game, formatted_answer, recent_limit);
        self.last_game = Some(game);
        self.pending_target = PendingTarget::LastGame;
    }

    pub fn set_last_game_list(&mut self, game_list: GameList) {
        self.last_game_list = Some(game_list);
        self.pending_target = PendingTarget::LastGameList;
    }

    /// Prepend a game to the recent games, evicting the oldest beyond `limit`.
    ///
    /// A game already in the list keeps its position.
    pub fn add_recent_game(&mut self, game: &Game, formatted_answer: &str, limit: usize) {
        if self.recent_games.iter().any(|recent| recent.id == game.id) {
            debug!(game_id = %game.id, "Game already among recent games");
            return;
        }
        self.recent_games.insert(
            0,
            InlineAnswer {
                formatted_answer: formatted_answer.to_string(),
                id: game.id.clone(),
                title: title_case(&game.name),
                thumb_url: game.thumbnail.clone(),
            },
        );
        self.recent_games.truncate(limit);
    }

    /// Attach a message identifier to the entry recorded last
    pub fn attach_message_id(&mut self, msg_id: i32) {
        match self.pending_target {
            PendingTarget::None => {}
            PendingTarget::LastGame => {
                if let Some(game) = self.last_game.as_mut() {
                    game.msg_id = Some(msg_id);
                }
            }
            PendingTarget::LastGameList => {
                if let Some(list) = self.last_game_list.as_mut() {
                    list.msg_id = Some(msg_id);
                }
            }
        }
    }

    pub fn pending_target(&self) -> PendingTarget {
        self.pending_target
    }

    pub fn recent_games(&self) -> &[InlineAnswer] {
        &self.recent_games
    }

    /// The identifier of the game at a 1-based `position` in the last game list
    pub fn listed_game_id(&self, position: &str) -> Result<&str, HistoryError> {
        let list = self
            .last_game_list
            .as_ref()
            .ok_or(HistoryError::MissingFromChatHistory)?;
        let game = position
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| list.get(index))
            .ok_or_else(|| HistoryError::IndexOutOfBound(position.to_string()))?;
        Ok(&game.id)
    }

    pub fn last_game_msg_id(&self) -> Option<i32> {
        self.last_game.as_ref().and_then(|game| game.msg_id)
    }

    pub fn last_game_list_msg_id(&self) -> Option<i32> {
        self.last_game_list.as_ref().and_then(|list| list.msg_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: &str) -> Game {
        Game::new(id, format!("Game {id}"))
    }

    #[test]
    fn test_recent_games_are_bounded_and_most_recent_first() {
        let mut history = ChatHistory::new();
        for id in ["1", "2", "3", "4", "5", "6", "7"] {
            history.set_last_game(game(id), "body", 5);
        }

        let ids: Vec<&str> = history.recent_games().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "6", "5", "4", "3"]);
    }

    #[test]
    fn test_readding_a_recent_game_does_not_move_it() {
        let mut history = ChatHistory::new();
        history.set_last_game(game("1"), "one", 5);
        history.set_last_game(game("2"), "two", 5);
        history.set_last_game(game("1"), "one again", 5);

        let ids: Vec<&str> = history.recent_games().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(history.recent_games()[1].formatted_answer, "one");
        // The last game is still updated
        assert_eq!(history.last_game.as_ref().unwrap().id, "1");
    }

    #[test]
    fn test_recent_game_title_matches_inline_results() {
        let mut history = ChatHistory::new();
        history.set_last_game(Game::new("13", "the settlers of CATAN"), "body", 5);
        assert_eq!(history.recent_games()[0].title, "The Settlers Of Catan");
    }

    #[test]
    fn test_message_id_goes_to_last_recorded_entry() {
        let mut history = ChatHistory::new();
        history.attach_message_id(1);
        assert_eq!(history.pending_target(), PendingTarget::None);

        history.set_last_game(game("30549"), "body", 5);
        history.set_last_game_list(GameList::new(vec![game("1"), game("2")], "game"));
        history.attach_message_id(42);

        assert_eq!(history.last_game_list_msg_id(), Some(42));
        assert_eq!(history.last_game_msg_id(), None);

        history.set_last_game(game("30549"), "body", 5);
        history.attach_message_id(43);
        assert_eq!(history.last_game_msg_id(), Some(43));
        assert_eq!(history.last_game_list_msg_id(), Some(42));
    }

    #[test]
    fn test_listed_game_by_position() {
        let mut history = ChatHistory::new();
        history.set_last_game(game("30549"), "body", 5);
        assert_eq!(
            history.listed_game_id("1"),
            Err(HistoryError::MissingFromChatHistory)
        );

        history.set_last_game_list(GameList::new(vec![game("10"), game("20")], "game"));

        assert_eq!(history.listed_game_id("1"), Ok("10"));
        assert_eq!(history.listed_game_id(" 2"), Ok("20"));
        assert_eq!(
            history.listed_game_id("3"),
            Err(HistoryError::IndexOutOfBound("3".to_string()))
        );
        assert_eq!(
            history.listed_game_id("0"),
            Err(HistoryError::IndexOutOfBound("0".to_string()))
        );
        assert_eq!(
            history.listed_game_id("two"),
            Err(HistoryError::IndexOutOfBound("two".to_string()))
        );
    }
}
