//! # History Tests
//!
//! Tests of the shared history tables and their snapshots on disk.

mod common;

use boardgamebot::config::HistoryConfig;
use boardgamebot::game::GameList;
use boardgamebot::history::persistence::{load_history, save_history};
use boardgamebot::history::{HistoryError, HistoryStore, PendingTarget};
use tempfile::TempDir;

use common::{numbered_games, pandemic};

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &TempDir) -> HistoryConfig {
        HistoryConfig {
            chat_history_path: dir.path().join("chat_history.json"),
            user_history_path: dir.path().join("user_history.json"),
            ..Default::default()
        }
    }

    /// Test that a created history is the one returned afterwards
    #[test]
    fn test_get_or_create_then_get() {
        let store = HistoryStore::default();
        assert_eq!(store.get(5), Err(HistoryError::ChatHistoryNotFound));

        let created = store.get_or_create(5);
        assert_eq!(store.get(5), Ok(created));
        assert_eq!(store.chat_count(), 1);
    }

    /// Test that the recent games stay bounded and free of duplicates
    #[test]
    fn test_recent_games_bounded_without_duplicates() {
        let store = HistoryStore::new(3);
        let games = numbered_games(1, 5);
        for game in games.iter().chain(games.iter().skip(3)) {
            store.record_game(5, game.clone(), &game.name);
        }

        let history = store.get(5).unwrap();
        let ids: Vec<&str> = history.recent_games().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["5", "4", "3"]);
        assert_eq!(history.recent_games()[0].formatted_answer, "Game 5");
    }

    /// Test that list positions are 1-based over the whole last list
    #[test]
    fn test_listed_game_positions() {
        let store = HistoryStore::default();
        let mut list = GameList::new(numbered_games(1, 15), "game");
        list.set_offset(10).unwrap();
        store.record_game_list(5, list);

        assert_eq!(store.listed_game_id(5, "1").unwrap(), "1");
        assert_eq!(store.listed_game_id(5, "12").unwrap(), "12");
        assert_eq!(
            store.listed_game_id(5, "16"),
            Err(HistoryError::IndexOutOfBound("16".to_string()))
        );
        assert_eq!(
            store.listed_game_id(6, "1"),
            Err(HistoryError::ChatHistoryNotFound)
        );
    }

    /// Test that the message id goes to the entry recorded last
    #[test]
    fn test_message_id_goes_to_pending_target() {
        let store = HistoryStore::default();
        store.record_game(5, pandemic(), "Pandemic");
        store.record_game_list(5, GameList::new(numbered_games(1, 12), "game"));
        assert_eq!(store.get(5).unwrap().pending_target(), PendingTarget::LastGameList);

        store.attach_message_id(5, 77);
        assert_eq!(store.last_game_list(5).unwrap().msg_id, Some(77));
        assert_eq!(store.last_game(5).unwrap().msg_id, None);
    }

    /// Test that the first private chat of a user is kept
    #[test]
    fn test_bind_user_first_write_wins() {
        let store = HistoryStore::default();
        store.bind_user_to_chat(42, 1000);
        store.bind_user_to_chat(42, 2000);
        assert_eq!(store.private_chat(42), Some(1000));
        assert_eq!(store.private_chat(43), None);
    }

    /// Test that the recent games of a user come from the private chat
    #[test]
    fn test_recent_games_of_user() {
        let store = HistoryStore::default();
        assert_eq!(
            store.recent_games_of_user(42),
            Err(HistoryError::ChatHistoryNotFound)
        );

        store.bind_user_to_chat(42, 1000);
        store.record_game(1000, pandemic(), "<b>Pandemic</b>");
        let recent = store.recent_games_of_user(42).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].formatted_answer, "<b>Pandemic</b>");
    }

    /// Test that saved tables are loaded back identical
    #[test]
    fn test_snapshot_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let store = HistoryStore::default();
        store.bind_user_to_chat(42, 1000);
        store.record_game(1000, pandemic(), "Pandemic");
        store.attach_message_id(1000, 3);
        let mut list = GameList::new(numbered_games(1, 15), "game");
        list.set_offset(10).unwrap();
        store.record_game_list(2000, list);

        save_history(&store, &config);
        assert!(config.chat_history_path.exists());
        assert!(config.user_history_path.exists());

        let loaded = load_history(&config);
        assert_eq!(loaded.snapshot(), store.snapshot());
        assert_eq!(loaded.last_game_list(2000).unwrap().offset(), 10);
        assert_eq!(loaded.last_game(1000).unwrap().msg_id, Some(3));
    }

    /// Test that a corrupt snapshot starts an empty history
    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::write(&config.chat_history_path, "{ not json").unwrap();

        let loaded = load_history(&config);
        assert_eq!(loaded.chat_count(), 0);
    }
}
