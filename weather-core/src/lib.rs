//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind a provider trait
//! - A search session that tracks the current result, loading state and error message
//! - Recent-search history and theme preference, persisted through a key-value storage trait
//! - Display helpers (temperatures, icon URLs, timestamps)
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod model;
pub mod provider;
pub mod session;
pub mod storage;
pub mod theme;

pub use config::{Config, ProviderConfig};
pub use error::WeatherError;
pub use history::{HistoryStore, MAX_HISTORY_ENTRIES};
pub use model::{HistoryEntry, WeatherQuery, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use session::SearchSession;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use theme::{Theme, ThemeStore};
