//! Routing of callback button presses
//!
//! Buttons are attached to the messages showing a game (`g` data) or a page
//! of a game list (`l` data). The message id of the press tells whether the
//! button belongs to the message the chat history refers to; when it does
//! not, the game or list is fetched again instead of reused.

use tracing::{error, info, warn};

use super::{RequestError, RequestManager};
use crate::answer::Answer;
use crate::bgg_errors::BggError;
use crate::config::LIST_PAGE_SIZE;
use crate::game::GameList;
use crate::history::HistoryError;
use crate::input_parser::{parse_callback_game_data, parse_callback_list_data, ListDirection};
use crate::output_formatter::{
    format_bad_callback_data, format_bgg_unreachable_callback, format_game, format_game_list,
    format_history_not_found_callback, format_no_result_found_callback, format_stale_list,
};

impl RequestManager {
    /// Process the press of a button attached to the message `msg_id`.
    ///
    /// Successful presses edit the message in place, failures are notified
    /// to the user who pressed the button.
    pub async fn process_callback(&self, data: &str, chat_id: i64, msg_id: i32) -> Answer {
        let result = if let Some(game_data) = data.strip_prefix('g') {
            self.process_game_callback(game_data, chat_id, msg_id).await
        } else if let Some(list_data) = data.strip_prefix('l') {
            self.process_list_callback(list_data, chat_id, msg_id).await
        } else {
            Err(RequestError::BadCallbackData(data.to_string()))
        };

        match result {
            Ok(answer) => answer,
            Err(e) => callback_error_answer(e, chat_id),
        }
    }

    async fn process_game_callback(
        &self,
        data: &str,
        chat_id: i64,
        msg_id: i32,
    ) -> Result<Answer, RequestError> {
        let parsed = parse_callback_game_data(data)
            .ok_or_else(|| RequestError::BadCallbackData(data.to_string()))?;
        let history = self.history.get(chat_id)?;

        let payload = if history.last_game_msg_id() != Some(msg_id) {
            info!(chat_id, msg_id, game_id = %parsed.id, "Game callback on another message, fetching the game");
            let payload = self.search_by_id(&parsed.id, chat_id, parsed.more).await?;
            self.history.attach_message_id(chat_id, msg_id);
            payload
        } else {
            info!(chat_id, msg_id, game_id = %parsed.id, "Game callback");
            let game = history
                .last_game
                .ok_or(HistoryError::MissingFromChatHistory)?;
            format_game(&game, parsed.more)
        };
        Ok(Answer::Edit(payload))
    }

    async fn process_list_callback(
        &self,
        data: &str,
        chat_id: i64,
        msg_id: i32,
    ) -> Result<Answer, RequestError> {
        let parsed = parse_callback_list_data(data)
            .ok_or_else(|| RequestError::BadCallbackData(data.to_string()))?;
        // A chat that never showed a list has nothing its buttons could belong to
        let last_list = self
            .history
            .get(chat_id)?
            .last_game_list
            .ok_or(HistoryError::ChatHistoryNotFound)?;

        let mut list = if last_list.msg_id != Some(msg_id) {
            info!(chat_id, msg_id, search = %parsed.original_search, "List callback on another message, searching again");
            self.refetch_list(&parsed.original_search, parsed.offset, chat_id, msg_id)
                .await?
        } else {
            info!(chat_id, msg_id, "List callback");
            last_list
        };

        let current = list.offset() as i64;
        let step = LIST_PAGE_SIZE as i64;
        let new_offset = match parsed.direction {
            ListDirection::Next => current + step,
            ListDirection::Previous => current - step,
        };
        if let Err(e) = list.set_offset(new_offset) {
            error!(chat_id, offset = new_offset, len = list.len(), "New offset is out of bound, this should not happen");
            return Err(RequestError::ListNavigationOutOfBound(e));
        }

        let payload = format_game_list(&list);
        self.history.update_last_game_list(chat_id, list);
        Ok(Answer::Edit(payload))
    }

    /// Repeat the search of an older list and make it the last list of the chat
    async fn refetch_list(
        &self,
        original_search: &str,
        offset: i64,
        chat_id: i64,
        msg_id: i32,
    ) -> Result<GameList, RequestError> {
        let mut list = match self.source.fetch_by_name(original_search).await {
            Ok(list) => list,
            Err(BggError::NoResult) => return Err(RequestError::StaleListCallback),
            Err(e) => return Err(e.into()),
        };
        list.original_search = original_search.to_string();
        list.set_offset(offset)
            .map_err(RequestError::ListNavigationOutOfBound)?;
        list.msg_id = Some(msg_id);

        self.history.record_game_list(chat_id, list.clone());
        self.history.attach_message_id(chat_id, msg_id);
        Ok(list)
    }
}

fn callback_error_answer(err: RequestError, chat_id: i64) -> Answer {
    match err {
        RequestError::History(
            HistoryError::ChatHistoryNotFound | HistoryError::MissingFromChatHistory,
        ) => {
            info!(chat_id, "Callback on a chat without history");
            format_history_not_found_callback()
        }
        RequestError::StaleListCallback => format_stale_list(),
        RequestError::Bgg(BggError::NoResult) => format_no_result_found_callback(),
        RequestError::Bgg(e @ (BggError::Unreachable { .. } | BggError::MalformedResponse(_))) => {
            error!(chat_id, error = %e, "BoardGameGeek query failed");
            format_bgg_unreachable_callback()
        }
        RequestError::ListNavigationOutOfBound(_) => format_bad_callback_data(),
        e @ (RequestError::BadCallbackData(_)
        | RequestError::History(HistoryError::IndexOutOfBound(_))
        | RequestError::MissingArgument
        | RequestError::InvalidOffset(_)) => {
            warn!(chat_id, error = %e, "Bad callback");
            format_bad_callback_data()
        }
    }
}
