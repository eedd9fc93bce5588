//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{debug, warn};

use super::sender::{send_answer, Origin};
use crate::output_formatter::format_bad_callback_data;
use crate::request_manager::RequestManager;

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    manager: Arc<RequestManager>,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    let data = q.data.as_deref().unwrap_or("");
    let answer = match &q.message {
        Some(msg) => {
            manager
                .process_callback(data, msg.chat().id.0, msg.id().0)
                .await
        }
        None => {
            warn!(user_id = %q.from.id, "Callback query without message");
            format_bad_callback_data()
        }
    };

    send_answer(&bot, manager.history(), Origin::Callback(&q), answer).await
}
