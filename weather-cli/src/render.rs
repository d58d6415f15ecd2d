//! Human-readable output for the session state and the history list.

use chrono::Local;
use std::io::IsTerminal;
use weather_core::{
    HistoryEntry, SearchSession, Storage, Theme, WeatherProvider, WeatherSnapshot,
    format::{format_temperature, format_timestamp, icon_url},
};

const RESET: &str = "\x1b[0m";

/// Prints to stdout with emphasis picked for the current theme.
#[derive(Debug, Clone)]
pub struct Renderer {
    accent: Option<&'static str>,
    muted: Option<&'static str>,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        let colored = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self::with_color(theme, colored)
    }

    pub fn with_color(theme: Theme, colored: bool) -> Self {
        if !colored {
            return Self {
                accent: None,
                muted: None,
            };
        }

        match theme {
            Theme::Dark => Self {
                accent: Some("\x1b[1;96m"),
                muted: Some("\x1b[37m"),
            },
            Theme::Light => Self {
                accent: Some("\x1b[1;34m"),
                muted: Some("\x1b[90m"),
            },
        }
    }

    fn accent(&self, text: &str) -> String {
        paint(self.accent, text)
    }

    fn muted(&self, text: &str) -> String {
        paint(self.muted, text)
    }

    pub fn session<P: WeatherProvider, S: Storage>(&self, session: &SearchSession<P, S>) {
        println!("{}", self.session_text(session));
    }

    pub fn session_text<P: WeatherProvider, S: Storage>(
        &self,
        session: &SearchSession<P, S>,
    ) -> String {
        if session.is_loading() {
            return self.muted("Getting weather information...");
        }

        if !session.error().is_empty() {
            return format!("{}\n{}", self.accent("Oops! Something went wrong"), session.error());
        }

        match session.current() {
            Some(snapshot) => self.snapshot_text(snapshot),
            None => format!(
                "{}\n{}",
                self.accent("Search for a city"),
                self.muted("Enter a city name to get current weather information")
            ),
        }
    }

    pub fn snapshot_text(&self, snapshot: &WeatherSnapshot) -> String {
        let mut lines = Vec::new();

        lines.push(self.accent(&snapshot.location()));
        lines.push(format!(
            "{}  H: {}  L: {}",
            self.accent(&format_temperature(snapshot.main.temp)),
            format_temperature(snapshot.main.temp_max),
            format_temperature(snapshot.main.temp_min),
        ));

        if let Some(condition) = snapshot.primary_condition() {
            lines.push(format!("{} ({})", condition.main, condition.description));
        }

        lines.push(format!(
            "Feels like {}  Humidity {}%  Pressure {} hPa",
            format_temperature(snapshot.main.feels_like),
            snapshot.main.humidity,
            snapshot.main.pressure,
        ));
        lines.push(format!(
            "Wind {} m/s at {}°  Clouds {}%",
            snapshot.wind.speed, snapshot.wind.deg, snapshot.clouds.all
        ));

        if let Some(observed) = snapshot.observed_at() {
            lines.push(self.muted(&format_timestamp(&observed.with_timezone(&Local))));
        }
        if let Some(condition) = snapshot.primary_condition() {
            lines.push(self.muted(&icon_url(&condition.icon)));
        }

        lines.join("\n")
    }

    pub fn history(&self, history: &[HistoryEntry]) {
        println!("\n{}", self.history_text(history));
    }

    pub fn history_text(&self, history: &[HistoryEntry]) -> String {
        if history.is_empty() {
            return self.muted("No recent searches");
        }

        let mut lines = vec![self.accent("Search History")];
        for (idx, entry) in history.iter().enumerate() {
            let temp = entry
                .weather_data
                .as_ref()
                .map(|w| format!("  {}", format_temperature(w.main.temp)))
                .unwrap_or_default();

            lines.push(format!(
                "{:>2}. {}{}  {}  {}",
                idx + 1,
                entry.location(),
                temp,
                self.muted(&format_timestamp(&entry.timestamp.with_timezone(&Local))),
                self.muted(&format!("[{}]", entry.id)),
            ));
        }

        lines.join("\n")
    }
}

fn paint(code: Option<&str>, text: &str) -> String {
    match code {
        Some(code) => format!("{code}{text}{RESET}"),
        None => text.to_string(),
    }
}
