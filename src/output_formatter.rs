//! # Output Formatter Module
//!
//! Turns games, game lists and failures into HTML payloads ready to be sent
//! through Telegram, together with the buttons attached to them.

use tracing::{info, warn};

use crate::answer::{Answer, ButtonAction, DisplayPayload, InlineAnswer, InlineButton, Keyboard};
use crate::config::LIST_PAGE_SIZE;
use crate::game::{Game, GameList};
use crate::localization::{t, t_args};

/// Descriptions longer than this are cut in the detailed view
pub const DESCRIPTION_MAX_CHARS: usize = 800;

/// Separator between the search string and the offset in list callback data
pub const CALLBACK_DATA_SEPARATOR: &str = "--";

/// Telegram rejects buttons whose callback data is longer than this, in bytes
pub const CALLBACK_DATA_MAX_BYTES: usize = 64;

/// Escape the characters Telegram interprets in HTML mode
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn bold(text: &str) -> String {
    format!("<b>{text}</b>")
}

fn italic(text: &str) -> String {
    format!("<i>{text}</i>")
}

fn link(href: &str, label: &str) -> String {
    format!("<a href=\"{href}\">{label}</a>")
}

/// Uppercase the first letter of every word and lowercase the others
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if previous_is_letter {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }
    result
}

/// Round a rating to one decimal, dropping a zero decimal part
fn format_rating(average: &str) -> Option<String> {
    let value: f64 = average.trim().parse().ok()?;
    let rounded = format!("{value:.1}");
    Some(rounded.trim_end_matches('0').trim_end_matches('.').to_string())
}

fn format_game_title(game: &Game) -> String {
    let mut s = bold(&escape_html(&title_case(&game.name)));
    if let Some(year) = &game.year {
        s.push_str(&format!(" ({year})"));
    }
    s.push('\n');
    s
}

fn format_name_list(singular: &str, plural: &str, names: &[String]) -> String {
    if names.is_empty() {
        return String::new();
    }
    let label = if names.len() == 1 { t(singular) } else { t(plural) };
    let joined = names
        .iter()
        .map(|name| escape_html(name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} {joined}.\n", italic(&label))
}

fn format_players(game: &Game) -> String {
    let label = italic(&t("label-players"));
    match (&game.min_players, &game.max_players) {
        (Some(min), Some(max)) => {
            let more_than_min = match (min.parse::<u32>(), max.parse::<u32>()) {
                (Ok(min), Ok(max)) => max > min,
                _ => false,
            };
            if more_than_min {
                format!("{label} {min} - {max}")
            } else {
                format!("{label} {min}")
            }
        }
        (Some(players), None) | (None, Some(players)) => format!("{label} {players}"),
        (None, None) => String::new(),
    }
}

fn format_game_info(game: &Game) -> String {
    let mut s = format_name_list("label-designer", "label-designers", &game.designers);
    s.push_str(&format_name_list("label-artist", "label-artists", &game.artists));

    if let Some(average) = &game.average {
        match format_rating(average) {
            Some(rating) => s.push_str(&format!("{} {rating}\n", italic(&t("label-rating")))),
            None => info!(average = %average, "Game average is not a number"),
        }
    }
    if let Some(rank) = &game.rank {
        s.push_str(&format!("{} {rank}\n", italic(&t("label-rank"))));
    }
    if let Some(playing_time) = game.playing_time.as_deref().filter(|time| *time != "0") {
        s.push_str(&format!(
            "{} {}\n",
            italic(&t("label-playing-time")),
            t_args("playing-time-minutes", &[("minutes", playing_time)])
        ));
    }
    s.push_str(&format_players(game));
    s.push('\n');
    s
}

fn format_game_description(game: &Game) -> String {
    let mut chars = game.description.char_indices();
    match chars.nth(DESCRIPTION_MAX_CHARS) {
        Some((cut, _)) => format!("{}...\n", escape_html(&game.description[..cut])),
        None => format!("{}\n", escape_html(&game.description)),
    }
}

fn format_game_links(game: &Game, with_cover: bool) -> String {
    let mut s = String::new();
    if with_cover {
        if let Some(thumbnail) = &game.thumbnail {
            s.push_str(&link(thumbnail, &t("link-cover")));
            s.push('\n');
        }
    }
    s.push_str(&link(&game.link, &t("link-bgg")));
    s.push('\n');
    s
}

/// The body describing a game with its basic information
fn format_game_body_less(game: &Game) -> String {
    let mut s = format_game_title(game);
    s.push('\n');
    s.push_str(&format_game_info(game));
    s.push_str(&format_game_links(game, true));
    s
}

/// The body describing a game with its description
fn format_game_body_more(game: &Game) -> String {
    let mut s = format_game_title(game);
    s.push('\n');
    s.push_str(&format_game_description(game));
    s.push_str(&format_game_links(game, false));
    s
}

/// Format a game, either with its basic information or with its description.
///
/// The first button switches to the other view, the second shares the game
/// through the inline mode.
pub fn format_game(game: &Game, more: bool) -> DisplayPayload {
    let (body, toggle) = if more {
        (
            format_game_body_more(game),
            InlineButton::callback(t("button-game-info"), format!("gl{}", game.id)),
        )
    } else {
        (
            format_game_body_less(game),
            InlineButton::callback(t("button-description"), format!("gm{}", game.id)),
        )
    };
    let share = InlineButton::switch_inline_query(t("button-share"), format!("i {}", game.id));

    let payload = DisplayPayload::new(body).with_keyboard(Keyboard::Inline(vec![vec![toggle, share]]));
    if more {
        payload.without_link_preview()
    } else {
        payload
    }
}

/// Format a game as a selectable inline result
pub fn format_inline_game(game: &Game) -> InlineAnswer {
    InlineAnswer {
        formatted_answer: format_game_body_less(game),
        id: game.id.clone(),
        title: title_case(&game.name),
        thumb_url: game.thumbnail.clone(),
    }
}

/// Callback data asking to move a list page, `direction` being `p` or `n`
pub fn list_callback_data(direction: char, list: &GameList) -> String {
    format!(
        "l{direction}{}{CALLBACK_DATA_SEPARATOR}{}",
        list.original_search,
        list.offset()
    )
}

/// Format the page of a game list starting at its current offset
pub fn format_game_list(list: &GameList) -> DisplayPayload {
    let mut body = String::new();
    for (position, game) in (list.offset() + 1..).zip(list.page(LIST_PAGE_SIZE)) {
        body.push_str(&format!(
            "\u{25BA} {position}. {}",
            bold(&escape_html(&title_case(&game.name)))
        ));
        if let Some(year) = &game.year {
            body.push_str(&format!(" ({year})"));
        }
        body.push_str(&format!(" - ID: {}\n", game.id));
    }

    let mut buttons = Vec::new();
    if list.has_previous_page() {
        buttons.push(InlineButton::callback(t("button-back"), list_callback_data('p', list)));
    }
    if list.has_next_page(LIST_PAGE_SIZE) {
        buttons.push(InlineButton::callback(t("button-next"), list_callback_data('n', list)));
    }
    // A single oversized button makes Telegram reject the whole message
    buttons.retain(|button| match &button.action {
        ButtonAction::Callback(data) if data.len() > CALLBACK_DATA_MAX_BYTES => {
            warn!(search = %list.original_search, bytes = data.len(), "Search too long for list buttons, dropping them");
            false
        }
        _ => true,
    });

    let payload = DisplayPayload::new(body);
    if buttons.is_empty() {
        payload
    } else {
        payload.with_keyboard(Keyboard::Inline(vec![buttons]))
    }
}

pub fn format_help() -> Answer {
    Answer::Message(DisplayPayload::new(t("help")).without_link_preview())
}

pub fn format_no_result_found() -> Answer {
    Answer::Message(DisplayPayload::new(t("no-result")))
}

pub fn format_no_result_found_callback() -> Answer {
    Answer::CallbackNotice(t("no-result"))
}

pub fn format_bgg_unreachable() -> Answer {
    Answer::Message(DisplayPayload::new(t("bgg-unreachable")))
}

pub fn format_bgg_unreachable_callback() -> Answer {
    Answer::CallbackNotice(t("bgg-unreachable"))
}

pub fn format_command_not_supported(command: &str) -> Answer {
    let command = escape_html(command);
    Answer::Message(DisplayPayload::new(t_args(
        "command-not-supported",
        &[("command", &command)],
    )))
}

pub fn format_history_not_found() -> Answer {
    Answer::Message(DisplayPayload::new(t("history-not-found")))
}

pub fn format_history_not_found_callback() -> Answer {
    Answer::CallbackNotice(t("history-not-found"))
}

pub fn format_game_list_index_not_valid(index: &str) -> Answer {
    let index = escape_html(index);
    Answer::Message(DisplayPayload::new(t_args("index-not-valid", &[("index", &index)])))
}

pub fn format_stale_list() -> Answer {
    Answer::CallbackNotice(t("stale-list"))
}

pub fn format_bad_callback_data() -> Answer {
    Answer::CallbackNotice(t("bad-callback"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::ButtonAction;

    fn pandemic() -> Game {
        let mut game = Game::new("30549", "pandemic")
            .with_year("2008")
            .with_description("Four diseases <threaten> the world & you.")
            .with_thumbnail("https://cf.geekdo-images.com/pandemic.jpg");
        game.designers = vec!["Matt Leacock".to_string()];
        game.artists = vec!["Josh Cappel".to_string(), "Chris Quilliams".to_string()];
        game.average = Some("7.59456".to_string());
        game.rank = Some("106".to_string());
        game.playing_time = Some("45".to_string());
        game.min_players = Some("2".to_string());
        game.max_players = Some("4".to_string());
        game
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ticket to ride"), "Ticket To Ride");
        assert_eq!(title_case("CATAN"), "Catan");
        assert_eq!(title_case("7 wonders: duel"), "7 Wonders: Duel");
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating("7.59456"), Some("7.6".to_string()));
        assert_eq!(format_rating("8.0"), Some("8".to_string()));
        assert_eq!(format_rating("10"), Some("10".to_string()));
        assert_eq!(format_rating("n/a"), None);
    }

    #[test]
    fn test_format_game_short_view() {
        let payload = format_game(&pandemic(), false);

        assert!(payload.text.starts_with("<b>Pandemic</b> (2008)\n\n"));
        assert!(payload.text.contains("<i>Designer:</i> Matt Leacock.\n"));
        assert!(payload.text.contains("<i>Artists:</i> Josh Cappel, Chris Quilliams.\n"));
        assert!(payload.text.contains("<i>Rating:</i> 7.6\n"));
        assert!(payload.text.contains("<i>Rank:</i> 106\n"));
        assert!(payload.text.contains("<i>Playing time:</i> 45 minutes.\n"));
        assert!(payload.text.contains("<i>Players:</i> 2 - 4\n"));
        assert!(payload.text.contains(">Cover</a>"));
        assert!(payload
            .text
            .ends_with("<a href=\"https://boardgamegeek.com/boardgame/30549\">Read on BoardGameGeek.</a>\n"));
        assert!(!payload.disable_link_preview);

        let buttons = payload.inline_buttons();
        assert_eq!(buttons[0].text, "Description");
        assert_eq!(buttons[0].action, ButtonAction::Callback("gm30549".to_string()));
        assert_eq!(buttons[1].action, ButtonAction::SwitchInlineQuery("i 30549".to_string()));
    }

    #[test]
    fn test_format_game_detailed_view() {
        let payload = format_game(&pandemic(), true);

        assert!(payload
            .text
            .contains("Four diseases &lt;threaten&gt; the world &amp; you.\n"));
        assert!(!payload.text.contains("Cover"));
        assert!(payload.disable_link_preview);
        assert_eq!(
            payload.inline_buttons()[0].action,
            ButtonAction::Callback("gl30549".to_string())
        );
    }

    #[test]
    fn test_long_description_is_cut() {
        let game = Game::new("1", "Long").with_description("é".repeat(DESCRIPTION_MAX_CHARS + 5));
        let payload = format_game(&game, true);
        let expected = format!("{}...\n", "é".repeat(DESCRIPTION_MAX_CHARS));
        assert!(payload.text.contains(&expected));
    }

    #[test]
    fn test_players_are_compared_as_numbers() {
        let mut game = Game::new("1", "Party");
        game.min_players = Some("2".to_string());
        game.max_players = Some("10".to_string());
        assert_eq!(format_players(&game), "<i>Players:</i> 2 - 10");

        game.max_players = Some("2".to_string());
        assert_eq!(format_players(&game), "<i>Players:</i> 2");

        game.min_players = None;
        assert_eq!(format_players(&game), "<i>Players:</i> 2");
    }

    #[test]
    fn test_zero_playing_time_is_hidden() {
        let mut game = Game::new("1", "Instant");
        game.playing_time = Some("0".to_string());
        assert!(!format_game(&game, false).text.contains("Playing time"));
    }

    #[test]
    fn test_format_game_list_pages() {
        let games = (1..=12)
            .map(|i| Game::new(i.to_string(), format!("game {i}")).with_year("2000"))
            .collect();
        let mut list = GameList::new(games, "game");

        let first = format_game_list(&list);
        assert!(first.text.starts_with("\u{25BA} 1. <b>Game 1</b> (2000) - ID: 1\n"));
        assert_eq!(first.text.lines().count(), LIST_PAGE_SIZE);
        let buttons = first.inline_buttons();
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].text, "Next");
        assert_eq!(buttons[0].action, ButtonAction::Callback("lngame--0".to_string()));

        list.set_offset(10).unwrap();
        let second = format_game_list(&list);
        assert!(second.text.starts_with("\u{25BA} 11. <b>Game 11</b>"));
        let buttons = second.inline_buttons();
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].action, ButtonAction::Callback("lpgame--10".to_string()));
    }

    #[test]
    fn test_long_search_drops_list_buttons() {
        let games = (1..=12).map(|i| Game::new(i.to_string(), format!("game {i}"))).collect();
        let search = "the lord of the rings the fellowship of the ring deckbuilding game";
        let list = GameList::new(games, search);

        let payload = format_game_list(&list);
        assert!(payload.keyboard.is_none());
        assert!(payload.text.starts_with("\u{25BA} 1. <b>Game 1</b>"));

        let games = (1..=12).map(|i| Game::new(i.to_string(), format!("game {i}"))).collect();
        let list = GameList::new(games, "a".repeat(CALLBACK_DATA_MAX_BYTES - 5));
        assert_eq!(list_callback_data('n', &list).len(), CALLBACK_DATA_MAX_BYTES);
        assert_eq!(format_game_list(&list).inline_buttons().len(), 1);
    }

    #[test]
    fn test_short_list_has_no_keyboard() {
        let list = GameList::new(vec![Game::new("1", "A"), Game::new("2", "B")], "a");
        assert!(format_game_list(&list).keyboard.is_none());
    }

    #[test]
    fn test_format_inline_game() {
        let answer = format_inline_game(&pandemic());
        assert_eq!(answer.id, "30549");
        assert_eq!(answer.title, "Pandemic");
        assert_eq!(answer.formatted_answer, format_game(&pandemic(), false).text);
    }

    #[test]
    fn test_error_answers() {
        assert_eq!(format_no_result_found().text(), Some("No result found!"));
        assert_eq!(
            format_command_not_supported("foo").text(),
            Some("Sorry, <b>/foo</b> is not a valid command.")
        );
        assert!(matches!(format_stale_list(), Answer::CallbackNotice(_)));
        assert!(matches!(format_history_not_found(), Answer::Message(_)));
        assert!(matches!(format_history_not_found_callback(), Answer::CallbackNotice(_)));
    }
}
