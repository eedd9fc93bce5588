//! UI Builder module for converting answers into Telegram markup

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult, InlineQueryResultArticle,
    InputMessageContent, InputMessageContentText, KeyboardButton, KeyboardMarkup,
    LinkPreviewOptions, ParseMode, ReplyMarkup,
};
use tracing::warn;

use crate::answer::{ButtonAction, InlineAnswer, InlineButton, Keyboard};

/// Create the inline keyboard attached below a message
pub fn create_inline_keyboard(rows: &[Vec<InlineButton>]) -> InlineKeyboardMarkup {
    let buttons: Vec<Vec<InlineKeyboardButton>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| match &button.action {
                    ButtonAction::Callback(data) => {
                        InlineKeyboardButton::callback(button.text.clone(), data.clone())
                    }
                    ButtonAction::SwitchInlineQuery(query) => {
                        InlineKeyboardButton::switch_inline_query(button.text.clone(), query.clone())
                    }
                })
                .collect()
        })
        .collect();

    InlineKeyboardMarkup::new(buttons)
}

/// Create the markup of a new message, whatever the kind of keyboard
pub fn create_reply_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Inline(rows) => create_inline_keyboard(rows).into(),
        Keyboard::Reply(rows) => {
            let buttons: Vec<Vec<KeyboardButton>> = rows
                .iter()
                .map(|row| row.iter().map(KeyboardButton::new).collect())
                .collect();
            KeyboardMarkup::new(buttons).into()
        }
    }
}

/// Only inline keyboards survive an edit; a reply keyboard is dropped
pub fn create_edit_markup(keyboard: Option<&Keyboard>) -> Option<InlineKeyboardMarkup> {
    match keyboard {
        Some(Keyboard::Inline(rows)) => Some(create_inline_keyboard(rows)),
        Some(Keyboard::Reply(_)) => {
            warn!("Reply keyboards cannot be attached to an edited message");
            None
        }
        None => None,
    }
}

pub fn link_preview_options(disabled: bool) -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: disabled,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

/// Create the article sent when an inline result is chosen
pub fn create_inline_result(answer: &InlineAnswer) -> InlineQueryResult {
    let content = InputMessageContent::Text(
        InputMessageContentText::new(answer.formatted_answer.clone()).parse_mode(ParseMode::Html),
    );
    let mut article = InlineQueryResultArticle::new(answer.id.clone(), answer.title.clone(), content);

    if let Some(thumb_url) = &answer.thumb_url {
        match reqwest::Url::parse(thumb_url) {
            Ok(url) => article = article.thumbnail_url(url),
            Err(e) => warn!(game_id = %answer.id, error = %e, "Invalid thumbnail url"),
        }
    }

    InlineQueryResult::Article(article)
}
