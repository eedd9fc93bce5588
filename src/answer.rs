//! # Answer Types Module
//!
//! The answers produced by the request manager and consumed by the transport
//! layer. Each variant carries exactly what its sender needs.

use serde::{Deserialize, Serialize};

/// An answer to an inbound event
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Send a new message to the chat
    Message(DisplayPayload),
    /// Edit the message the callback button is attached to
    Edit(DisplayPayload),
    /// Show a short notification to the user who pressed a callback button
    CallbackNotice(String),
    /// Answer an inline query
    Inline(InlineAnswerList),
}

impl Answer {
    /// Turn a message into an in-place edit; other kinds are returned unchanged
    pub fn into_edit(self) -> Self {
        match self {
            Answer::Message(payload) => Answer::Edit(payload),
            other => other,
        }
    }

    /// The displayed text, whatever the kind of answer
    pub fn text(&self) -> Option<&str> {
        match self {
            Answer::Message(payload) | Answer::Edit(payload) => Some(&payload.text),
            Answer::CallbackNotice(text) => Some(text),
            Answer::Inline(_) => None,
        }
    }
}

/// A formatted message body with its controls
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayPayload {
    /// HTML formatted text
    pub text: String,
    pub keyboard: Option<Keyboard>,
    pub disable_link_preview: bool,
}

impl DisplayPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn without_link_preview(mut self) -> Self {
        self.disable_link_preview = true;
        self
    }

    /// Every inline button of the payload, row by row
    pub fn inline_buttons(&self) -> Vec<&InlineButton> {
        match &self.keyboard {
            Some(Keyboard::Inline(rows)) => rows.iter().flatten().collect(),
            _ => Vec::new(),
        }
    }
}

/// Controls attached to a message
#[derive(Debug, Clone, PartialEq)]
pub enum Keyboard {
    /// Buttons shown below the message
    Inline(Vec<Vec<InlineButton>>),
    /// Buttons replacing the user's keyboard, each sending its label
    Reply(Vec<Vec<String>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineButton {
    pub text: String,
    pub action: ButtonAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonAction {
    /// Send the data back as a callback query
    Callback(String),
    /// Open the inline mode in another chat with the query prefilled
    SwitchInlineQuery(String),
}

impl InlineButton {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    pub fn switch_inline_query(text: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::SwitchInlineQuery(query.into()),
        }
    }
}

/// A single selectable inline result, describing one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineAnswer {
    /// HTML message sent when the result is chosen
    pub formatted_answer: String,
    /// Game identifier, also used as result identifier
    pub id: String,
    pub title: String,
    pub thumb_url: Option<String>,
}

/// The answer to an inline query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineAnswerList {
    /// Seconds the result may be cached by Telegram
    pub cache_time: u32,
    /// Whether the cached result is only valid for the user who asked
    pub is_personal: bool,
    pub answers: Vec<InlineAnswer>,
    /// Offset to send back to get the next page, if any
    #[serde(default)]
    pub next_offset: Option<String>,
}

impl InlineAnswerList {
    pub fn new(cache_time: u32, is_personal: bool) -> Self {
        Self {
            cache_time,
            is_personal,
            answers: Vec::new(),
            next_offset: None,
        }
    }

    pub fn with_answers(mut self, answers: Vec<InlineAnswer>) -> Self {
        self.answers = answers;
        self
    }

    pub fn push(&mut self, answer: InlineAnswer) {
        self.answers.push(answer);
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl Default for InlineAnswerList {
    /// An empty, non cacheable list
    fn default() -> Self {
        Self::new(0, true)
    }
}
