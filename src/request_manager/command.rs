//! Routing of chat commands

use tracing::{error, info, warn};

use super::{RequestError, RequestManager};
use crate::answer::Answer;
use crate::bgg_errors::BggError;
use crate::history::HistoryError;
use crate::input_parser::Command;
use crate::output_formatter::{
    format_bgg_unreachable, format_command_not_supported, format_game_list_index_not_valid,
    format_help, format_history_not_found, format_no_result_found,
};

impl RequestManager {
    /// Process a command sent in a chat.
    ///
    /// Always returns a message to send, failures included.
    pub async fn process_command(
        &self,
        command: &Command,
        argument: Option<&str>,
        chat_id: i64,
    ) -> Answer {
        match self.dispatch_command(command, argument, chat_id).await {
            Ok(answer) => answer,
            Err(e) => command_error_answer(e, chat_id),
        }
    }

    async fn dispatch_command(
        &self,
        command: &Command,
        argument: Option<&str>,
        chat_id: i64,
    ) -> Result<Answer, RequestError> {
        let payload = match command {
            Command::Start | Command::Help => {
                info!(chat_id, "help");
                return Ok(format_help());
            }
            Command::SearchById => {
                info!(chat_id, "id");
                self.search_by_id(required(argument)?, chat_id, false).await?
            }
            Command::SearchByName => {
                info!(chat_id, "boardgame");
                self.search_list(required(argument)?, false, chat_id).await?
            }
            Command::SearchByNameExact => {
                info!(chat_id, "exact");
                self.search_list(required(argument)?, true, chat_id).await?
            }
            Command::GameFromList => {
                info!(chat_id, "game from list");
                let id = self.history.listed_game_id(chat_id, required(argument)?)?;
                self.search_by_id(&id, chat_id, false).await?
            }
            Command::Unsupported(name) => {
                info!(chat_id, command = %name, "Command not supported");
                return Ok(format_command_not_supported(name));
            }
        };
        Ok(Answer::Message(payload))
    }
}

fn required(argument: Option<&str>) -> Result<&str, RequestError> {
    argument.ok_or(RequestError::MissingArgument)
}

fn command_error_answer(err: RequestError, chat_id: i64) -> Answer {
    match err {
        RequestError::Bgg(BggError::NoResult) => format_no_result_found(),
        RequestError::Bgg(e @ (BggError::Unreachable { .. } | BggError::MalformedResponse(_))) => {
            error!(chat_id, error = %e, "BoardGameGeek query failed");
            format_bgg_unreachable()
        }
        RequestError::History(
            HistoryError::ChatHistoryNotFound | HistoryError::MissingFromChatHistory,
        ) => format_history_not_found(),
        RequestError::History(HistoryError::IndexOutOfBound(index)) => {
            format_game_list_index_not_valid(&index)
        }
        RequestError::MissingArgument => format_help(),
        e @ (RequestError::BadCallbackData(_)
        | RequestError::ListNavigationOutOfBound(_)
        | RequestError::StaleListCallback
        | RequestError::InvalidOffset(_)) => {
            warn!(chat_id, error = %e, "Unexpected error while processing a command");
            format_help()
        }
    }
}
