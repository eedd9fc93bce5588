//! # History Persistence Module
//!
//! Saves and loads the history tables as JSON snapshots. Each table lives in
//! its own file, written atomically through a temporary file in the same
//! directory. Missing or corrupt snapshots are tolerated: the bot starts with
//! empty tables.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{error, info, warn};

use super::{ChatHistory, HistoryStore};
use crate::answer::InlineAnswerList;
use crate::config::HistoryConfig;

/// A saved table with the time it was written
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<T> {
    saved_at: DateTime<Utc>,
    entries: T,
}

/// Save both history tables; failures are logged, never returned
pub fn save_history(store: &HistoryStore, config: &HistoryConfig) {
    let (chats, users) = store.snapshot();

    match write_snapshot(&config.chat_history_path, chats) {
        Ok(size) => warn_if_large(&config.chat_history_path, size, config.warning_size),
        Err(e) => error!(error = %e, "Cannot save chat history!"),
    }
    match write_snapshot(&config.user_history_path, users) {
        Ok(size) => warn_if_large(&config.user_history_path, size, config.warning_size),
        Err(e) => error!(error = %e, "Cannot save user history!"),
    }
}

/// Load the history tables, starting empty where a snapshot cannot be read
pub fn load_history(config: &HistoryConfig) -> HistoryStore {
    let chats: HashMap<i64, ChatHistory> = match read_snapshot(&config.chat_history_path) {
        Ok(chats) => chats,
        Err(e) => {
            warn!(error = %e, "Cannot read chat history");
            HashMap::new()
        }
    };
    let users: HashMap<u64, i64> = match read_snapshot(&config.user_history_path) {
        Ok(users) => users,
        Err(e) => {
            warn!(error = %e, "Cannot read user history");
            HashMap::new()
        }
    };

    info!(chats = chats.len(), users = users.len(), "History loaded");
    HistoryStore::from_tables(chats, users, config.recent_games_limit)
}

/// Load the precomputed default inline answer, or an empty one if it cannot be read
pub fn load_inline_default(path: &Path) -> InlineAnswerList {
    match read_json(path) {
        Ok(default) => default,
        Err(e) => {
            error!(error = %e, "Cannot read inline default");
            InlineAnswerList::default()
        }
    }
}

pub fn save_inline_default(path: &Path, inline_default: &InlineAnswerList) -> Result<()> {
    write_json(path, inline_default).map(|_| ())
}

fn write_snapshot<T: Serialize>(path: &Path, entries: T) -> Result<u64> {
    let snapshot = Snapshot {
        saved_at: Utc::now(),
        entries,
    };
    write_json(path, &snapshot)
}

fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let snapshot: Snapshot<T> = read_json(path)?;
    info!(path = %path.display(), saved_at = %snapshot.saved_at, "Snapshot read");
    Ok(snapshot.entries)
}

/// Write `value` to `path` atomically and return the size of the file
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<u64> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut temp_file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        serde_json::to_writer(&mut writer, value).context("Failed to serialize snapshot")?;
        writer.flush()?;
    }
    temp_file.as_file().sync_all()?;
    let file = temp_file
        .persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(file.metadata()?.len())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn warn_if_large(path: &Path, size: u64, warning_size: u64) {
    if size > warning_size {
        error!(path = %path.display(), size, "Very large history size!");
    }
}
