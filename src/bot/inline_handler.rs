//! Inline Handler module for processing inline queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::InlineQuery;
use tracing::debug;

use super::sender::{send_answer, Origin};
use crate::answer::Answer;
use crate::input_parser::parse_inline_query;
use crate::request_manager::RequestManager;

pub async fn inline_handler(bot: Bot, q: InlineQuery, manager: Arc<RequestManager>) -> Result<()> {
    debug!(user_id = %q.from.id, query = %q.query, offset = %q.offset, "Received inline query");

    let (command, query) = parse_inline_query(&q.query);
    let list = manager
        .process_inline(command.as_ref(), &query, q.from.id.0, Some(q.offset.as_str()))
        .await;

    send_answer(&bot, manager.history(), Origin::Inline(&q), Answer::Inline(list)).await
}
