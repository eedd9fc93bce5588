//! Shared helpers for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use boardgamebot::answer::{InlineAnswer, InlineAnswerList};
use boardgamebot::bgg::GameSource;
use boardgamebot::bgg_errors::BggError;
use boardgamebot::game::{Game, GameList};
use boardgamebot::history::HistoryStore;
use boardgamebot::request_manager::RequestManager;

/// A game source answering from memory and counting its calls
#[derive(Default)]
pub struct MockGameSource {
    games: HashMap<String, Game>,
    lists: HashMap<String, Vec<Game>>,
    exact_lists: HashMap<String, Vec<Game>>,
    failure: Option<BggError>,
    by_id_calls: AtomicUsize,
    by_name_calls: AtomicUsize,
    exact_calls: AtomicUsize,
}

impl MockGameSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_game(mut self, game: Game) -> Self {
        self.games.insert(game.id.clone(), game);
        self
    }

    /// Register the games and make them the fuzzy result for `name`
    pub fn with_list(mut self, name: &str, games: Vec<Game>) -> Self {
        for game in &games {
            self.games.entry(game.id.clone()).or_insert_with(|| game.clone());
        }
        self.lists.insert(name.to_string(), games);
        self
    }

    /// Register the games and make them the exact result for `name`
    pub fn with_exact_list(mut self, name: &str, games: Vec<Game>) -> Self {
        for game in &games {
            self.games.entry(game.id.clone()).or_insert_with(|| game.clone());
        }
        self.exact_lists.insert(name.to_string(), games);
        self
    }

    pub fn failing(error: BggError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    pub fn by_id_calls(&self) -> usize {
        self.by_id_calls.load(Ordering::SeqCst)
    }

    pub fn by_name_calls(&self) -> usize {
        self.by_name_calls.load(Ordering::SeqCst)
    }

    pub fn exact_calls(&self) -> usize {
        self.exact_calls.load(Ordering::SeqCst)
    }

    fn search(&self, lists: &HashMap<String, Vec<Game>>, name: &str) -> Result<GameList, BggError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        lists
            .get(name)
            .map(|games| {
                let summaries = games
                    .iter()
                    .map(|game| {
                        let summary = Game::new(game.id.clone(), game.name.clone());
                        match &game.year {
                            Some(year) => summary.with_year(year.clone()),
                            None => summary,
                        }
                    })
                    .collect();
                GameList::new(summaries, name)
            })
            .ok_or(BggError::NoResult)
    }
}

#[async_trait]
impl GameSource for MockGameSource {
    async fn fetch_by_id(&self, id: &str) -> Result<Game, BggError> {
        self.by_id_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.games.get(id).cloned().ok_or(BggError::NoResult)
    }

    async fn fetch_by_name(&self, name: &str) -> Result<GameList, BggError> {
        self.by_name_calls.fetch_add(1, Ordering::SeqCst);
        self.search(&self.lists, name)
    }

    async fn fetch_by_name_exact(&self, name: &str) -> Result<GameList, BggError> {
        self.exact_calls.fetch_add(1, Ordering::SeqCst);
        self.search(&self.exact_lists, name)
    }
}

pub fn pandemic() -> Game {
    let mut game = Game::new("30549", "Pandemic")
        .with_year("2008")
        .with_description("In Pandemic, several virulent diseases have broken out simultaneously.")
        .with_thumbnail("https://cf.geekdo-images.com/pandemic.jpg");
    game.designers = vec!["Matt Leacock".to_string()];
    game.average = Some("7.58".to_string());
    game.min_players = Some("2".to_string());
    game.max_players = Some("4".to_string());
    game
}

/// Games `first..=last` named `Game <n>`
pub fn numbered_games(first: usize, last: usize) -> Vec<Game> {
    (first..=last)
        .map(|i| Game::new(i.to_string(), format!("Game {i}")).with_year("2020"))
        .collect()
}

pub fn default_inline_answer() -> InlineAnswerList {
    InlineAnswerList::new(3600, true).with_answers(vec![InlineAnswer {
        formatted_answer: "<b>Codenames</b>".to_string(),
        id: "178900".to_string(),
        title: "Codenames".to_string(),
        thumb_url: None,
    }])
}

/// A request manager on a fresh history
pub fn request_manager(source: MockGameSource) -> (RequestManager, Arc<MockGameSource>) {
    let source = Arc::new(source);
    let manager = RequestManager::new(
        source.clone(),
        Arc::new(HistoryStore::default()),
        default_inline_answer(),
    );
    (manager, source)
}
