//! Chat and user history
//!
//! This module is split into several submodules:
//! - `chat_history`: The state kept for a single chat
//! - `store`: The shared tables of chat histories and user private chats
//! - `persistence`: Snapshots of the tables on disk
//! - `background`: The task saving snapshots at a fixed interval

pub mod background;
pub mod chat_history;
pub mod persistence;
pub mod store;

pub use chat_history::{ChatHistory, PendingTarget};
pub use store::HistoryStore;

/// Errors raised when the history does not contain what a request refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// Nothing was ever recorded for the chat (or the user has no private chat)
    ChatHistoryNotFound,
    /// The chat exists but the requested entry was never recorded
    MissingFromChatHistory,
    /// A 1-based position outside the recent games list
    IndexOutOfBound(String),
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::ChatHistoryNotFound => write!(f, "Chat history not found"),
            HistoryError::MissingFromChatHistory => write!(f, "Entry missing from chat history"),
            HistoryError::IndexOutOfBound(index) => write!(f, "Index out of bound: {index}"),
        }
    }
}

impl std::error::Error for HistoryError {}
