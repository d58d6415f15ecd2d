//! Recent-search history.
//!
//! The whole list lives under a single storage key as a JSON array, most recent first.
//! None of the operations fail from the caller's point of view: unreadable, corrupted or
//! unwritable storage is logged and treated as "no history".

use tracing::{error, warn};

use crate::{model::HistoryEntry, storage::Storage};

pub const HISTORY_STORAGE_KEY: &str = "weather-app-search-history";
pub const MAX_HISTORY_ENTRIES: usize = 10;

#[derive(Debug)]
pub struct HistoryStore<S> {
    storage: S,
}

impl<S: Storage> HistoryStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load(&self) -> Vec<HistoryEntry> {
        let stored = match self.storage.get_item(HISTORY_STORAGE_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Vec::new(),
            Err(err) => {
                error!("Error reading search history: {err:#}");
                return Vec::new();
            }
        };

        if stored.trim().is_empty() {
            return Vec::new();
        }

        let raw: Vec<serde_json::Value> = match serde_json::from_str(&stored) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Stored search history is not readable, ignoring it: {err}");
                return Vec::new();
            }
        };

        // A damaged entry costs only itself.
        raw.into_iter()
            .enumerate()
            .filter_map(|(idx, value)| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping unreadable search history entry #{idx}: {err}");
                    None
                }
            })
            .collect()
    }

    /// Put `entry` at the front, dropping any older entry for the same city
    /// (case-insensitive) and anything past [`MAX_HISTORY_ENTRIES`].
    pub fn upsert(&self, entry: HistoryEntry) {
        let city = entry.city.to_lowercase();

        let mut history = Vec::with_capacity(MAX_HISTORY_ENTRIES);
        history.push(entry);
        history.extend(self.load().into_iter().filter(|h| h.city.to_lowercase() != city));
        history.truncate(MAX_HISTORY_ENTRIES);

        if let Err(err) = self.persist(&history) {
            error!("Error saving search history: {err:#}");
        }
    }

    /// Drop the entry with `id`. The list is written back even when nothing matched.
    pub fn remove(&self, id: &str) {
        let history: Vec<HistoryEntry> =
            self.load().into_iter().filter(|entry| entry.id != id).collect();

        if let Err(err) = self.persist(&history) {
            error!("Error removing from search history: {err:#}");
        }
    }

    pub fn clear(&self) {
        if let Err(err) = self.storage.remove_item(HISTORY_STORAGE_KEY) {
            error!("Error clearing search history: {err:#}");
        }
    }

    fn persist(&self, history: &[HistoryEntry]) -> anyhow::Result<()> {
        let json = serde_json::to_string(history)?;
        self.storage.set_item(HISTORY_STORAGE_KEY, &json)
    }
}
