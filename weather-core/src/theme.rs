use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

use crate::storage::Storage;

pub const THEME_STORAGE_KEY: &str = "weather-app-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Terminal colour-scheme preference, taken from `COLORFGBG`.
    pub fn detect_system() -> Self {
        Self::from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
    }

    /// `COLORFGBG` is `"<fg>;<bg>"` (sometimes with a middle field); background colours
    /// 0-6 and 8 are the dark half of the 16-colour palette.
    pub fn from_colorfgbg(value: Option<&str>) -> Self {
        let background = value
            .and_then(|v| v.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok());

        match background {
            Some(0..=6 | 8) => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted light/dark preference.
#[derive(Debug)]
pub struct ThemeStore<S> {
    storage: S,
}

impl<S: Storage> ThemeStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The saved theme, or `system_preference` when nothing valid is saved.
    pub fn load(&self, system_preference: Theme) -> Theme {
        match self.storage.get_item(THEME_STORAGE_KEY) {
            Ok(saved) => saved.as_deref().and_then(Theme::parse).unwrap_or(system_preference),
            Err(err) => {
                error!("Error loading theme: {err:#}");
                Theme::Light
            }
        }
    }

    pub fn save(&self, theme: Theme) {
        if let Err(err) = self.storage.set_item(THEME_STORAGE_KEY, theme.as_str()) {
            error!("Error saving theme: {err:#}");
        }
    }

    pub fn toggle(&self, current: Theme) -> Theme {
        let next = current.toggled();
        self.save(next);
        next
    }
}
