//! Routing of inline queries

use tracing::{error, info, warn};

use super::{RequestError, RequestManager};
use crate::answer::InlineAnswerList;
use crate::bgg_errors::BggError;
use crate::config::{
    INLINE_CACHE_TIME_SECS, INLINE_EXACT_QUERY_THRESHOLD, INLINE_LIST_PAGE_SIZE,
    RECENT_GAMES_CACHE_TIME_SECS,
};
use crate::history::HistoryError;
use crate::input_parser::{InlineCommand, RECENT_GAMES_QUERY};
use crate::output_formatter::format_inline_game;

impl RequestManager {
    /// Process an inline query.
    ///
    /// `offset` is the token sent back by Telegram to get the next page of a
    /// search. Any failure is answered with the default inline answer.
    pub async fn process_inline(
        &self,
        command: Option<&InlineCommand>,
        query: &str,
        user_id: u64,
        offset: Option<&str>,
    ) -> InlineAnswerList {
        match self.dispatch_inline(command, query, user_id, offset).await {
            Ok(answer) => answer,
            Err(e) => {
                match &e {
                    RequestError::Bgg(BggError::NoResult) => {
                        info!(user_id, query, "No inline result, sending default")
                    }
                    RequestError::History(
                        HistoryError::ChatHistoryNotFound | HistoryError::MissingFromChatHistory,
                    ) => info!(user_id, "No recent games, sending default"),
                    RequestError::InvalidOffset(_) => {
                        warn!(user_id, error = %e, "Sending default inline answer")
                    }
                    RequestError::Bgg(BggError::Unreachable { .. } | BggError::MalformedResponse(_))
                    | RequestError::History(HistoryError::IndexOutOfBound(_))
                    | RequestError::MissingArgument
                    | RequestError::BadCallbackData(_)
                    | RequestError::ListNavigationOutOfBound(_)
                    | RequestError::StaleListCallback => {
                        error!(user_id, error = %e, "Error in inline query, sending default")
                    }
                }
                self.inline_default().clone()
            }
        }
    }

    async fn dispatch_inline(
        &self,
        command: Option<&InlineCommand>,
        query: &str,
        user_id: u64,
        offset: Option<&str>,
    ) -> Result<InlineAnswerList, RequestError> {
        if let Some(InlineCommand::ById(id)) = command {
            info!(user_id, game_id = %id, "Inline by id");
            let game = self.source.fetch_by_id(id).await?;
            return Ok(InlineAnswerList::new(INLINE_CACHE_TIME_SECS, false)
                .with_answers(vec![format_inline_game(&game)]));
        }

        if query.is_empty() {
            info!(user_id, "Inline default");
            return Ok(self.inline_default().clone());
        }

        if query == RECENT_GAMES_QUERY {
            info!(user_id, "Inline recent games");
            let recent = self.history.recent_games_of_user(user_id)?;
            return Ok(InlineAnswerList::new(RECENT_GAMES_CACHE_TIME_SECS, true).with_answers(recent));
        }

        let offset = parse_offset(offset)?;
        let list = if query.chars().count() < INLINE_EXACT_QUERY_THRESHOLD {
            info!(user_id, query, offset, "Inline exact search");
            self.source.fetch_by_name_exact(query).await?
        } else {
            info!(user_id, query, offset, "Inline search");
            self.source.fetch_by_name(query).await?
        };

        let mut answer = InlineAnswerList::new(INLINE_CACHE_TIME_SECS, false);
        if offset >= list.len() {
            return Ok(answer);
        }
        let end = (offset + INLINE_LIST_PAGE_SIZE).min(list.len());
        for summary in &list.games()[offset..end] {
            let game = self.source.fetch_by_id(&summary.id).await?;
            answer.push(format_inline_game(&game));
        }
        if end < list.len() {
            answer.next_offset = Some(end.to_string());
        }
        Ok(answer)
    }
}

/// The position an inline page starts at; a missing or empty token is the first page
fn parse_offset(offset: Option<&str>) -> Result<usize, RequestError> {
    match offset.map(str::trim).filter(|offset| !offset.is_empty()) {
        None => Ok(0),
        Some(offset) => offset
            .parse()
            .map_err(|_| RequestError::InvalidOffset(offset.to_string())),
    }
}
