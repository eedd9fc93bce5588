//! Sending answers back to Telegram

use anyhow::{anyhow, Result};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, InlineQuery, InlineQueryResult, MessageId, ParseMode};
use teloxide::{ApiError, RequestError};
use tracing::{debug, error};

use super::ui_builder::{
    create_edit_markup, create_inline_result, create_reply_markup, link_preview_options,
};
use crate::answer::{Answer, DisplayPayload, InlineAnswerList};
use crate::history::HistoryStore;

/// The update an answer replies to
#[derive(Debug, Clone, Copy)]
pub enum Origin<'a> {
    Message(&'a Message),
    Callback(&'a CallbackQuery),
    Inline(&'a InlineQuery),
}

impl Origin<'_> {
    fn chat_id(&self) -> Option<ChatId> {
        match self {
            Origin::Message(msg) => Some(msg.chat.id),
            Origin::Callback(q) => q.message.as_ref().map(|msg| msg.chat().id),
            Origin::Inline(_) => None,
        }
    }

    fn message_id(&self) -> Option<MessageId> {
        match self {
            Origin::Message(msg) => Some(msg.id),
            Origin::Callback(q) => q.message.as_ref().map(|msg| msg.id()),
            Origin::Inline(_) => None,
        }
    }
}

/// Send an answer in the way its kind requires.
///
/// A callback query is always answered exactly once, with a notice when the
/// answer is one. An answer that does not fit its origin is a defect and is
/// returned as an error.
pub async fn send_answer(
    bot: &Bot,
    history: &HistoryStore,
    origin: Origin<'_>,
    answer: Answer,
) -> Result<()> {
    let result = match answer {
        Answer::Message(payload) => match origin.chat_id() {
            Some(chat_id) => send_message(bot, history, chat_id, payload).await,
            None => Err(anyhow!("A message answer needs a chat")),
        },
        Answer::Edit(payload) => match (origin.chat_id(), origin.message_id()) {
            (Some(chat_id), Some(message_id)) => edit_message(bot, chat_id, message_id, payload).await,
            _ => Err(anyhow!("An edit answer needs a message")),
        },
        Answer::CallbackNotice(text) => match origin {
            Origin::Callback(q) => {
                bot.answer_callback_query(q.id.clone()).text(text).await?;
                return Ok(());
            }
            _ => Err(anyhow!("A callback notice needs a callback query")),
        },
        Answer::Inline(list) => match origin {
            Origin::Inline(q) => answer_inline_query(bot, q, list).await,
            _ => Err(anyhow!("An inline answer needs an inline query")),
        },
    };

    if let Origin::Callback(q) = origin {
        bot.answer_callback_query(q.id.clone()).await?;
    }
    result
}

async fn send_message(
    bot: &Bot,
    history: &HistoryStore,
    chat_id: ChatId,
    payload: DisplayPayload,
) -> Result<()> {
    let mut request = bot
        .send_message(chat_id, payload.text)
        .parse_mode(ParseMode::Html)
        .link_preview_options(link_preview_options(payload.disable_link_preview));
    if let Some(keyboard) = &payload.keyboard {
        request = request.reply_markup(create_reply_markup(keyboard));
    }

    let sent = request.await?;
    history.attach_message_id(chat_id.0, sent.id.0);
    debug!(chat_id = %chat_id, message_id = sent.id.0, "Message sent");
    Ok(())
}

async fn edit_message(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    payload: DisplayPayload,
) -> Result<()> {
    let mut request = bot
        .edit_message_text(chat_id, message_id, payload.text)
        .parse_mode(ParseMode::Html)
        .link_preview_options(link_preview_options(payload.disable_link_preview));
    if let Some(markup) = create_edit_markup(payload.keyboard.as_ref()) {
        request = request.reply_markup(markup);
    }

    match request.await {
        Ok(_) => Ok(()),
        // The same button pressed twice produces the same text
        Err(RequestError::Api(ApiError::MessageNotModified)) => {
            debug!(chat_id = %chat_id, message_id = message_id.0, "Message not modified");
            Ok(())
        }
        Err(e) => {
            error!(chat_id = %chat_id, message_id = message_id.0, error = %e, "Failed to edit message");
            Err(e.into())
        }
    }
}

async fn answer_inline_query(bot: &Bot, q: &InlineQuery, list: InlineAnswerList) -> Result<()> {
    let results: Vec<InlineQueryResult> = list.answers.iter().map(create_inline_result).collect();

    let mut request = bot
        .answer_inline_query(q.id.clone(), results)
        .cache_time(list.cache_time)
        .is_personal(list.is_personal);
    if let Some(next_offset) = list.next_offset {
        request = request.next_offset(next_offset);
    }
    request.await?;
    Ok(())
}
