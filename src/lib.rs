//! # Board Game Telegram Bot
//!
//! A Telegram bot searching BoardGameGeek through commands, inline queries
//! and buttons, remembering the recent searches of every chat so that list
//! pages and game views can be switched in place.

pub mod answer;
pub mod bgg;
pub mod bgg_errors;
pub mod bot;
pub mod config;
pub mod game;
pub mod history;
pub mod input_parser;
pub mod localization;
pub mod output_formatter;
pub mod request_manager;
