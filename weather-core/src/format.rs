//! Small display helpers shared by front ends.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub fn icon_url(icon_code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon_code}@2x.png")
}

/// Whole degrees with a degree sign. Halves round up (`-2.5` gives `-2°`) and
/// negative zero prints as `0°`.
pub fn format_temperature(value: f64) -> String {
    let rounded = (value + 0.5).floor();
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}°")
}

pub fn format_timestamp<Tz>(when: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    when.format("%d-%m-%Y %H:%M").to_string()
}
