//! # Board Game Data Model
//!
//! This module defines the data structures produced by BoardGameGeek queries.
//!
//! ## Core Concepts
//!
//! - **Game**: a single board game with all the details of a `thing` query
//! - **GameList**: the ordered summaries returned by a name search, with the
//!   search string that produced them and the current page offset
//!
//! Game identifiers are kept as strings: they are opaque tokens and are never
//! compared or formatted as numbers.
//!
//! ## Usage
//!
//! ```rust
//! use boardgamebot::game::{Game, GameList};
//!
//! let pandemic = Game::new("30549", "Pandemic").with_year("2008");
//! let list = GameList::new(vec![pandemic], "pandemic");
//! assert_eq!(list.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::BOARDGAMEGEEK_BASE_ADDRESS;

/// A board game as returned by BoardGameGeek
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// BoardGameGeek identifier (may contain leading zeros)
    pub id: String,
    pub name: String,
    pub year: Option<String>,

    /// Average rating as reported by BoardGameGeek (not necessarily numeric)
    pub average: Option<String>,
    /// Overall board game rank (e.g. "12" or "Not Ranked")
    pub rank: Option<String>,
    /// Playing time in minutes
    pub playing_time: Option<String>,
    pub min_players: Option<String>,
    pub max_players: Option<String>,

    pub categories: Vec<String>,
    pub mechanics: Vec<String>,
    pub designers: Vec<String>,
    pub artists: Vec<String>,

    pub description: String,
    /// Absolute URL of the cover thumbnail
    pub thumbnail: Option<String>,
    /// Canonical BoardGameGeek page of the game
    pub link: String,

    /// Identifier of the message that displays this game, known only after sending
    pub msg_id: Option<i32>,
}

impl Game {
    /// Create a game with only its identifier and name set
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let link = format!("{BOARDGAMEGEEK_BASE_ADDRESS}{id}");
        Self {
            id,
            name: name.into(),
            year: None,
            average: None,
            rank: None,
            playing_time: None,
            min_players: None,
            max_players: None,
            categories: Vec::new(),
            mechanics: Vec::new(),
            designers: Vec::new(),
            artists: Vec::new(),
            description: String::new(),
            thumbnail: None,
            link,
            msg_id: None,
        }
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)?;
        if let Some(year) = &self.year {
            write!(f, " - {year}")?;
        }
        Ok(())
    }
}

/// Error returned when a page offset falls outside a game list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetOutOfBound {
    pub offset: i64,
    pub len: usize,
}

impl fmt::Display for OffsetOutOfBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset {} out of bound for a list of {} games", self.offset, self.len)
    }
}

impl std::error::Error for OffsetOutOfBound {}

/// Result of a search by name
///
/// The offset always points inside the list: it can only be changed
/// through [`GameList::set_offset`], which rejects out of range values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameList {
    games: Vec<Game>,
    offset: usize,
    /// The search string that produced the list, used to repeat the search
    pub original_search: String,
    /// Identifier of the message that displays this list, known only after sending
    pub msg_id: Option<i32>,
}

impl GameList {
    pub fn new(games: Vec<Game>, original_search: impl Into<String>) -> Self {
        Self {
            games,
            offset: 0,
            original_search: original_search.into(),
            msg_id: None,
        }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn get(&self, index: usize) -> Option<&Game> {
        self.games.get(index)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move the current page to `offset`, which must be within `[0, len)`
    pub fn set_offset(&mut self, offset: i64) -> Result<(), OffsetOutOfBound> {
        if offset < 0 || offset >= self.games.len() as i64 {
            return Err(OffsetOutOfBound {
                offset,
                len: self.games.len(),
            });
        }
        self.offset = offset as usize;
        Ok(())
    }

    /// The games displayed on the page starting at the current offset
    pub fn page(&self, page_size: usize) -> &[Game] {
        let end = (self.offset + page_size).min(self.games.len());
        &self.games[self.offset.min(end)..end]
    }

    /// Whether games exist after the page starting at the current offset
    pub fn has_next_page(&self, page_size: usize) -> bool {
        self.offset + page_size < self.games.len()
    }

    pub fn has_previous_page(&self) -> bool {
        self.offset > 0
    }
}

impl fmt::Display for GameList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for game in &self.games {
            writeln!(f, "{game}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(count: usize) -> GameList {
        let games = (0..count)
            .map(|i| Game::new(format!("{i:03}"), format!("Game {i}")))
            .collect();
        GameList::new(games, "game")
    }

    #[test]
    fn test_game_link_keeps_leading_zeros() {
        let game = Game::new("007", "Secret Agent");
        assert_eq!(game.link, "https://boardgamegeek.com/boardgame/007");
        assert_eq!(game.to_string(), "Secret Agent (007)");
    }

    #[test]
    fn test_set_offset_rejects_out_of_bound() {
        let mut list = list_of(12);
        assert!(list.set_offset(10).is_ok());
        assert_eq!(list.offset(), 10);

        let err = list.set_offset(12).unwrap_err();
        assert_eq!(err, OffsetOutOfBound { offset: 12, len: 12 });
        assert!(list.set_offset(-10).is_err());
        // A rejected offset leaves the previous one untouched
        assert_eq!(list.offset(), 10);
    }

    #[test]
    fn test_pages() {
        let mut list = list_of(23);
        assert_eq!(list.page(10).len(), 10);
        assert!(list.has_next_page(10));
        assert!(!list.has_previous_page());

        list.set_offset(20).unwrap();
        assert_eq!(list.page(10).len(), 3);
        assert_eq!(list.page(10)[0].id, "020");
        assert!(!list.has_next_page(10));
        assert!(list.has_previous_page());
    }

    #[test]
    fn test_empty_list_has_no_valid_offset() {
        let mut list = list_of(0);
        assert!(list.is_empty());
        assert!(list.page(10).is_empty());
        assert!(list.set_offset(0).is_err());
    }
}
