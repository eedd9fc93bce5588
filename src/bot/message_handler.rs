//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use super::sender::{send_answer, Origin};
use crate::input_parser::{Command, CommandParser};
use crate::request_manager::RequestManager;

/// Handle a message: commands are answered, other text is ignored
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    manager: Arc<RequestManager>,
    parser: Arc<CommandParser>,
) -> Result<()> {
    let chat_id = msg.chat.id;

    if msg.chat.is_private() {
        if let Some(user) = &msg.from {
            manager.history().bind_user_to_chat(user.id.0, chat_id.0);
        }
    }

    let answer = match msg.text() {
        Some(text) => {
            let Some(parsed) = parser.parse(text) else {
                debug!(chat_id = %chat_id, "Ignoring message without command");
                return Ok(());
            };
            debug!(chat_id = %chat_id, command = ?parsed.command, argument = ?parsed.argument, "Processing command");
            manager
                .process_command(&parsed.command, parsed.argument.as_deref(), chat_id.0)
                .await
        }
        // Only text is understood, anything else gets the help
        None => manager.process_command(&Command::Help, None, chat_id.0).await,
    };

    send_answer(&bot, manager.history(), Origin::Message(&msg), answer).await
}
