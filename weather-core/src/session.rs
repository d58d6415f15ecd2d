//! Search session: one lookup at a time, its outcome, and the history snapshot shown next
//! to it.
//!
//! Every operation that changes state takes `&mut self`, so a session can never have two
//! searches outstanding. A front end that wants to show the loading state splits a search
//! into [`SearchSession::begin_search`] and [`SearchSession::complete_search`]; everyone
//! else calls [`SearchSession::search`].

use chrono::Utc;
use tracing::{Instrument, debug, debug_span};

use crate::{
    error::user_message,
    history::HistoryStore,
    model::{HistoryEntry, WeatherQuery, WeatherSnapshot},
    provider::WeatherProvider,
    storage::Storage,
};

#[derive(Debug)]
pub struct SearchSession<P, S> {
    provider: P,
    store: HistoryStore<S>,
    current: Option<WeatherSnapshot>,
    loading: bool,
    error: String,
    history: Vec<HistoryEntry>,
}

impl<P: WeatherProvider, S: Storage> SearchSession<P, S> {
    pub fn new(provider: P, storage: S) -> Self {
        let store = HistoryStore::new(storage);
        let history = store.load();

        Self {
            provider,
            store,
            current: None,
            loading: false,
            error: String::new(),
            history,
        }
    }

    pub fn current(&self) -> Option<&WeatherSnapshot> {
        self.current.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message for the last failed search; empty when there is none.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn history_store(&self) -> &HistoryStore<S> {
        &self.store
    }

    /// Look up `city` (optionally narrowed by `country`). Blank input is ignored.
    pub async fn search(&mut self, city: &str, country: Option<&str>) {
        let Some(query) = self.begin_search(city, country) else {
            return;
        };

        let span = debug_span!("search", q = %query.to_query_param());
        let outcome = self.provider.fetch_current(&query).instrument(span).await;
        self.complete_search(outcome);
    }

    /// First half of [`search`](Self::search): validates input, marks the session as
    /// loading and clears the previous error. Returns the query to send, or `None` when the
    /// city is blank, in which case nothing changed.
    pub fn begin_search(&mut self, city: &str, country: Option<&str>) -> Option<WeatherQuery> {
        if city.trim().is_empty() {
            return None;
        }

        self.loading = true;
        self.error.clear();

        Some(WeatherQuery::new(city, country.map(str::to_string)))
    }

    /// Second half of [`search`](Self::search): records the outcome and ends loading.
    pub fn complete_search(&mut self, outcome: anyhow::Result<WeatherSnapshot>) {
        match outcome {
            Ok(snapshot) => {
                let entry = HistoryEntry::from_snapshot(&snapshot, Utc::now());
                debug!(id = %entry.id, city = %entry.city, "recording search in history");

                self.current = Some(snapshot);
                self.store.upsert(entry);
                self.history = self.store.load();
            }
            Err(err) => {
                debug!("search failed: {err:#}");
                self.error = user_message(&err);
                self.current = None;
            }
        }

        self.loading = false;
    }

    /// Repeat a past search with its stored city and country.
    pub async fn search_from_history(&mut self, entry: &HistoryEntry) {
        self.search(&entry.city, entry.country_filter()).await;
    }

    /// Repeat the history entry with `id`. Returns `false` when no such entry exists.
    pub async fn search_from_history_id(&mut self, id: &str) -> bool {
        let Some(entry) = self.history.iter().find(|entry| entry.id == id).cloned() else {
            return false;
        };

        self.search_from_history(&entry).await;
        true
    }

    pub fn delete_from_history(&mut self, id: &str) {
        self.store.remove(id);
        self.reload_history();
    }

    pub fn clear_history(&mut self) {
        self.store.clear();
        self.reload_history();
    }

    pub fn reload_history(&mut self) {
        self.history = self.store.load();
    }
}
