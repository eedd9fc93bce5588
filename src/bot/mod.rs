//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Handles incoming chat messages
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `inline_handler`: Handles inline queries
//! - `sender`: Sends every kind of answer back to Telegram
//! - `ui_builder`: Converts answers into Telegram keyboards and inline results

pub mod callback_handler;
pub mod inline_handler;
pub mod message_handler;
pub mod sender;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use inline_handler::inline_handler;
pub use message_handler::message_handler;
