use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::sync::Arc;
use tracing::warn;
use weather_core::{
    Config, FileStorage, MemoryStorage, SearchSession, Storage, Theme, ThemeStore, WeatherProvider,
    WeatherQuery, provider::provider_from_config,
};

use crate::render::Renderer;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Current weather lookups with a recent-search history"
)]
pub struct Cli {
    /// Log request and storage details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show current weather for a city.
    Search {
        /// City name, e.g. "Singapore".
        city: String,

        /// Optional ISO country code, e.g. "SG".
        #[arg(short, long)]
        country: Option<String>,
    },

    /// Work with recent searches (lists them when no action is given).
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Show or toggle the light/dark theme (shows it when no action is given).
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// List recent searches, most recent first.
    List,
    /// Search again using a history entry.
    Search { id: String },
    /// Remove one entry.
    Delete { id: String },
    /// Remove all entries.
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum ThemeAction {
    Show,
    Toggle,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config)?,
            Command::Search { city, country } => {
                let (storage, theme) = open_storage(&config);
                let renderer = Renderer::new(theme);
                let mut session = SearchSession::new(provider_from_config(&config)?, storage);

                let query = search_query(&city, country.as_deref());
                run_search(&mut session, &renderer, &query.city, query.country.as_deref()).await;
                renderer.history(session.history());
            }
            Command::History { action } => {
                let (storage, theme) = open_storage(&config);
                let renderer = Renderer::new(theme);
                let mut session = SearchSession::new(provider_from_config(&config)?, storage);

                match action.unwrap_or(HistoryAction::List) {
                    HistoryAction::List => {}
                    HistoryAction::Search { id } => {
                        let Some(entry) = session.history().iter().find(|e| e.id == id).cloned()
                        else {
                            anyhow::bail!("No history entry with id '{id}'");
                        };
                        run_search(&mut session, &renderer, &entry.city, entry.country_filter())
                            .await;
                    }
                    HistoryAction::Delete { id } => session.delete_from_history(&id),
                    HistoryAction::Clear => session.clear_history(),
                }
                renderer.history(session.history());
            }
            Command::Theme { action } => {
                let (storage, theme) = open_storage(&config);
                let theme = match action.unwrap_or(ThemeAction::Show) {
                    ThemeAction::Show => theme,
                    ThemeAction::Toggle => ThemeStore::new(storage).toggle(theme),
                };
                println!("Theme: {theme}");
            }
        }

        Ok(())
    }
}

/// `--country` wins when given; otherwise the positional argument may carry it as
/// `"City, CC"`.
fn search_query(city: &str, country: Option<&str>) -> WeatherQuery {
    match country.map(str::trim).filter(|country| !country.is_empty()) {
        Some(country) => WeatherQuery::new(city.trim(), Some(country.to_string())),
        None => WeatherQuery::from_input(city),
    }
}

/// Runs one search, showing the loading line while the request is out.
async fn run_search<P, S>(
    session: &mut SearchSession<P, S>,
    renderer: &Renderer,
    city: &str,
    country: Option<&str>,
) where
    P: WeatherProvider,
    S: Storage,
{
    let Some(query) = session.begin_search(city, country) else {
        renderer.session(session);
        return;
    };

    renderer.session(session);
    let outcome = session.provider().fetch_current(&query).await;
    session.complete_search(outcome);
    renderer.session(session);
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

/// File storage in the configured or platform data directory (in-memory when neither can
/// be determined, so nothing persists), plus the theme saved there.
fn open_storage(config: &Config) -> (Arc<dyn Storage>, Theme) {
    let storage = match &config.data_dir {
        Some(dir) => Ok(FileStorage::new(dir)),
        None => FileStorage::in_data_dir(),
    };

    let storage: Arc<dyn Storage> = match storage {
        Ok(storage) => Arc::new(storage),
        Err(err) => {
            warn!("History will not be saved: {err:#}");
            Arc::new(MemoryStorage::new())
        }
    };

    let theme = ThemeStore::new(storage.clone()).load(Theme::detect_system());
    (storage, theme)
}
