//! Parsing of BoardGameGeek XML API 2 responses
//!
//! `search` responses become a [`GameList`] of summaries, `thing` responses a
//! single [`Game`] with all its details.

use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::bgg_errors::BggError;
use crate::game::{Game, GameList};

const NO_DESCRIPTION: &str = "No description available.";

/// Parse the response of a `search` query
///
/// Only items of type `boardgame` are kept. The returned list has an empty
/// `original_search`, the caller knows what was searched.
pub fn parse_game_list(xml: &str) -> Result<GameList, BggError> {
    if xml.trim().is_empty() {
        return Err(BggError::NoResult);
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut games = Vec::new();
    // The board game item being parsed, with a flag telling whether its name was found
    let mut current: Option<(Game, bool)> = None;
    let mut skipping_item = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"item" => {
                if attribute(&e, "type")?.as_deref() == Some("boardgame") {
                    let id = attribute(&e, "id")?.unwrap_or_default();
                    current = Some((Game::new(id, String::new()), false));
                } else {
                    skipping_item = true;
                }
            }
            Event::Empty(e) | Event::Start(e) if !skipping_item => {
                if let Some((game, has_name)) = current.as_mut() {
                    match e.name().as_ref() {
                        b"name" if !*has_name => {
                            game.name = attribute(&e, "value")?.unwrap_or_default();
                            *has_name = true;
                        }
                        b"yearpublished" => game.year = attribute(&e, "value")?,
                        _ => {}
                    }
                }
            }
            Event::End(e) if e.name().as_ref() == b"item" => {
                if skipping_item {
                    skipping_item = false;
                } else if let Some((game, has_name)) = current.take() {
                    if !has_name {
                        warn!(game_id = %game.id, "Search result without name");
                        return Err(BggError::MalformedResponse(format!(
                            "item {} has no name",
                            game.id
                        )));
                    }
                    games.push(game);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if games.is_empty() {
        return Err(BggError::NoResult);
    }
    debug!(games = games.len(), "Parsed game list");
    Ok(GameList::new(games, String::new()))
}

/// Parse the response of a `thing` query
///
/// Only the first item is considered, and only if it is a board game or an
/// expansion.
pub fn parse_game(xml: &str) -> Result<Game, BggError> {
    if xml.trim().is_empty() {
        return Err(BggError::NoResult);
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut game: Option<Game> = None;
    let mut has_primary_name = false;
    // Names of the elements opened inside the item
    let mut path: Vec<Vec<u8>> = Vec::new();

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) | Event::Empty(e) => {
                let is_start = matches!(event, Event::Start(_));
                let name = e.name().as_ref().to_vec();

                match game.as_mut() {
                    None if name == b"item" => {
                        let item_type = attribute(e, "type")?;
                        if !matches!(
                            item_type.as_deref(),
                            Some("boardgame") | Some("boardgameexpansion")
                        ) {
                            debug!(item_type = ?item_type, "Thing is not a board game");
                            return Err(BggError::NoResult);
                        }
                        let id = attribute(e, "id")?.unwrap_or_default();
                        game = Some(Game::new(id, String::new()).with_description(NO_DESCRIPTION));
                        if !is_start {
                            break;
                        }
                        continue;
                    }
                    None => continue,
                    Some(game) => {
                        let parent = path.last().map(Vec::as_slice);
                        read_game_element(game, e, parent, &mut has_primary_name)?;
                    }
                }

                if is_start {
                    path.push(name);
                }
            }
            Event::Text(text) if game.is_some() => {
                if let Some(game) = game.as_mut() {
                    match path.last().map(Vec::as_slice) {
                        Some(b"description") => game.description = unescape_text(text)?,
                        Some(b"thumbnail") => {
                            game.thumbnail = Some(normalize_thumbnail(&unescape_text(text)?))
                        }
                        _ => {}
                    }
                }
            }
            Event::End(e) if game.is_some() => {
                if path.is_empty() && e.name().as_ref() == b"item" {
                    break;
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut game = game.ok_or(BggError::NoResult)?;
    if !has_primary_name {
        return Err(BggError::MalformedResponse(format!(
            "game {} has no primary name",
            game.id
        )));
    }
    if game.description.trim().is_empty() {
        game.description = NO_DESCRIPTION.to_string();
    }
    debug!(game = %game, "Parsed game");
    Ok(game)
}

/// Fill `game` with the content of an element found inside its item
fn read_game_element(
    game: &mut Game,
    e: &BytesStart<'_>,
    parent: Option<&[u8]>,
    has_primary_name: &mut bool,
) -> Result<(), BggError> {
    match (parent, e.name().as_ref()) {
        (None, b"name") => {
            if !*has_primary_name && attribute(e, "type")?.as_deref() == Some("primary") {
                game.name = attribute(e, "value")?.unwrap_or_default();
                *has_primary_name = true;
            }
        }
        (None, b"yearpublished") => game.year = attribute(e, "value")?,
        (None, b"playingtime") => game.playing_time = attribute(e, "value")?,
        (None, b"minplayers") => game.min_players = attribute(e, "value")?,
        (None, b"maxplayers") => game.max_players = attribute(e, "value")?,
        (None, b"link") => {
            let value = attribute(e, "value")?.unwrap_or_default();
            match attribute(e, "type")?.as_deref() {
                Some("boardgamecategory") => game.categories.push(value),
                Some("boardgamemechanic") => game.mechanics.push(value),
                Some("boardgamedesigner") => game.designers.push(value),
                Some("boardgameartist") => game.artists.push(value),
                _ => {}
            }
        }
        (Some(b"ratings"), b"average") => game.average = attribute(e, "value")?,
        (Some(b"ranks"), b"rank") => {
            if attribute(e, "id")?.as_deref() == Some("1") {
                game.rank = attribute(e, "value")?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, BggError> {
    match e.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// Unescape element text; BoardGameGeek escapes HTML entities a second time
fn unescape_text(text: &BytesText<'_>) -> Result<String, BggError> {
    let once = text.unescape_with(resolve_entity)?;
    let twice = match unescape_with(&once, resolve_entity) {
        Ok(value) => value.into_owned(),
        Err(_) => once.into_owned(),
    };
    Ok(twice)
}

fn resolve_entity(entity: &str) -> Option<&'static str> {
    resolve_predefined_entity(entity).or(match entity {
        "nbsp" => Some("\u{a0}"),
        "ndash" => Some("–"),
        "mdash" => Some("—"),
        "hellip" => Some("…"),
        "lsquo" => Some("‘"),
        "rsquo" => Some("’"),
        "ldquo" => Some("“"),
        "rdquo" => Some("”"),
        "times" => Some("×"),
        "eacute" => Some("é"),
        _ => None,
    })
}

/// Thumbnails may be protocol relative (`//cf.geekdo-images.com/...`)
fn normalize_thumbnail(thumb: &str) -> String {
    let thumb = thumb.trim();
    match thumb.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => thumb.to_string(),
    }
}
