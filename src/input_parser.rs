//! # Input Parser Module
//!
//! Parses the text of messages, the data of callback buttons and the
//! content of inline queries into typed requests.

use lazy_static::lazy_static;
use regex::Regex;

/// The inline query returning the recent games of the user
pub const RECENT_GAMES_QUERY: &str = "r";

lazy_static! {
    static ref CALLBACK_GAME_DATA: Regex =
        Regex::new(r"^(l|m)([0-9]+)$").expect("Game callback pattern should be valid");
    static ref CALLBACK_LIST_DATA: Regex =
        Regex::new(r"^(p|n)(.*)--([0-9]+)$").expect("List callback pattern should be valid");
    static ref INLINE_ID_QUERY: Regex =
        Regex::new(r"^i ([0-9]+)$").expect("Inline id pattern should be valid");
}

/// The commands understood by the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    SearchById,
    SearchByName,
    SearchByNameExact,
    /// Show a game of the last game list, from the `/<number>` shortcut
    GameFromList,
    Unsupported(String),
}

impl Command {
    pub fn from_name(name: &str) -> Self {
        match name {
            "start" => Command::Start,
            "help" => Command::Help,
            "i" | "id" => Command::SearchById,
            "b" | "boardgame" => Command::SearchByName,
            "e" | "exact" => Command::SearchByNameExact,
            "L" => Command::GameFromList,
            other => Command::Unsupported(other.to_string()),
        }
    }
}

/// A command with its optional argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: Command,
    pub argument: Option<String>,
}

/// Parser for chat messages, aware of the names the bot can be addressed with
#[derive(Debug, Clone)]
pub struct CommandParser {
    command_regex: Regex,
    list_regex: Regex,
}

impl CommandParser {
    /// Build the parser once the bot username and name are known
    pub fn new(bot_username: &str, bot_name: &str) -> Result<Self, regex::Error> {
        let names = format!("{}|{}", regex::escape(bot_username), regex::escape(bot_name));
        let command_regex = Regex::new(&format!(r"^/([a-zA-Z]+)(?:@(?:{names}))?(?: (.*))?"))?;
        let list_regex = Regex::new(&format!(r"^/([0-9]+)(?:@(?:{names}))?$"))?;

        Ok(Self {
            command_regex,
            list_regex,
        })
    }

    /// Parse a message, `None` if it does not start with a command
    pub fn parse(&self, text: &str) -> Option<ParsedCommand> {
        let text = text.trim();

        if let Some(captures) = self.command_regex.captures(text) {
            let argument = captures
                .get(2)
                .map(|argument| argument.as_str().trim())
                .filter(|argument| !argument.is_empty())
                .map(str::to_string);
            return Some(ParsedCommand {
                command: Command::from_name(&captures[1]),
                argument,
            });
        }

        self.list_regex
            .captures(text)
            .map(|captures| ParsedCommand {
                command: Command::GameFromList,
                argument: Some(captures[1].to_string()),
            })
    }
}

/// A game button press: switch to the detailed or the short view of a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCallbackData {
    pub more: bool,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDirection {
    Previous,
    Next,
}

/// A list button press: move one page from `offset`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCallbackData {
    pub direction: ListDirection,
    pub original_search: String,
    pub offset: i64,
}

/// Parse game callback data, without its `g` prefix
pub fn parse_callback_game_data(data: &str) -> Option<GameCallbackData> {
    let captures = CALLBACK_GAME_DATA.captures(data)?;
    Some(GameCallbackData {
        more: &captures[1] == "m",
        id: captures[2].to_string(),
    })
}

/// Parse list callback data, without its `l` prefix
pub fn parse_callback_list_data(data: &str) -> Option<ListCallbackData> {
    let captures = CALLBACK_LIST_DATA.captures(data)?;
    let direction = match &captures[1] {
        "n" => ListDirection::Next,
        _ => ListDirection::Previous,
    };
    Some(ListCallbackData {
        direction,
        original_search: captures[2].to_string(),
        offset: captures[3].parse().ok()?,
    })
}

/// The sub-commands of inline queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineCommand {
    ById(String),
}

/// Parse an inline query into an optional sub-command and the normalized query
pub fn parse_inline_query(query: &str) -> (Option<InlineCommand>, String) {
    let query = query.trim().to_lowercase();
    let command = INLINE_ID_QUERY
        .captures(&query)
        .map(|captures| InlineCommand::ById(captures[1].to_string()));
    (command, query)
}
