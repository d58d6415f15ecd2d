use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A city lookup, optionally narrowed down by ISO country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub country: Option<String>,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>, country: Option<String>) -> Self {
        Self {
            city: city.into(),
            country,
        }
    }

    /// Parse what a user typed into a search box: `"City"` or `"City, CC"`. Parts are
    /// trimmed, an empty country counts as none and anything after a second comma is dropped.
    pub fn from_input(input: &str) -> Self {
        let mut parts = input.split(',').map(str::trim);
        let city = parts.next().unwrap_or_default();
        let country = parts.next().filter(|country| !country.is_empty());

        Self::new(city, country.map(str::to_string))
    }

    /// Value of the `q` parameter: `"city"` or `"city,country"`.
    pub fn to_query_param(&self) -> String {
        match self.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{},{}", self.city, country),
            _ => self.city.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SysInfo {
    /// Missing for some locations (open water, disputed areas).
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// One observation as returned by the OpenWeather current-weather endpoint.
///
/// Field names follow the provider's JSON so the snapshot can be stored and read back
/// unchanged inside a [`HistoryEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub id: i64,
    pub name: String,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    pub clouds: Clouds,
    /// Observation time, seconds since epoch.
    pub dt: i64,
    pub sys: SysInfo,
    #[serde(default)]
    pub cod: i64,
}

impl WeatherSnapshot {
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.first()
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }

    /// `"Name, CC"`, or just the name when the country is unknown.
    pub fn location(&self) -> String {
        join_location(&self.name, &self.sys.country)
    }
}

/// A past successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub city: String,
    #[serde(default)]
    pub country: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_data: Option<WeatherSnapshot>,
}

impl HistoryEntry {
    /// Build an entry from a provider response; city and country come from the response,
    /// not from what the user typed.
    pub fn from_snapshot(snapshot: &WeatherSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            id: next_entry_id(now),
            city: snapshot.name.clone(),
            country: snapshot.sys.country.clone(),
            timestamp: now,
            weather_data: Some(snapshot.clone()),
        }
    }

    /// The stored country as a search filter; `None` when it is empty.
    pub fn country_filter(&self) -> Option<&str> {
        (!self.country.is_empty()).then_some(self.country.as_str())
    }

    pub fn location(&self) -> String {
        join_location(&self.city, &self.country)
    }
}

fn join_location(name: &str, country: &str) -> String {
    if country.is_empty() {
        name.to_string()
    } else {
        format!("{name}, {country}")
    }
}

static ENTRY_SEQ: AtomicU64 = AtomicU64::new(0);

/// `<unix-millis>-<seq>`; unique within a process.
pub fn next_entry_id(now: DateTime<Utc>) -> String {
    let seq = ENTRY_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", now.timestamp_millis(), seq)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn snapshot(name: &str, country: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            id: 1880252,
            name: name.to_string(),
            main: MainReadings {
                temp: 26.0,
                feels_like: 28.0,
                temp_min: 24.0,
                temp_max: 28.0,
                pressure: 1013.0,
                humidity: 80.0,
            },
            weather: vec![Condition {
                id: 800,
                main: "Clear".to_string(),
                description: "clear sky".to_string(),
                icon: "01d".to_string(),
            }],
            wind: Wind {
                speed: 5.1,
                deg: 230.0,
            },
            clouds: Clouds { all: 75.0 },
            dt: 1_640_995_200,
            sys: SysInfo {
                country: country.to_string(),
                sunrise: 1_640_995_200,
                sunset: 1_641_038_400,
            },
            cod: 200,
        }
    }

    #[test]
    fn query_param_with_and_without_country() {
        assert_eq!(WeatherQuery::new("Paris", Some("FR".into())).to_query_param(), "Paris,FR");
        assert_eq!(WeatherQuery::new("Paris", None).to_query_param(), "Paris");
        assert_eq!(WeatherQuery::new("Paris", Some(String::new())).to_query_param(), "Paris");
    }

    #[test]
    fn input_is_split_on_commas_and_trimmed() {
        assert_eq!(
            WeatherQuery::from_input("London, GB"),
            WeatherQuery::new("London", Some("GB".into()))
        );
        assert_eq!(WeatherQuery::from_input("London,"), WeatherQuery::new("London", None));
        assert_eq!(WeatherQuery::from_input("  Paris "), WeatherQuery::new("Paris", None));
        assert_eq!(
            WeatherQuery::from_input("Springfield , US, extra"),
            WeatherQuery::new("Springfield", Some("US".into()))
        );
        assert_eq!(WeatherQuery::from_input("   ").city, "");
    }

    #[test]
    fn payload_without_country_still_parses() {
        let body = r#"{
            "weather": [{"id": 500, "main": "Rain", "description": "light rain",
                         "icon": "10n"}],
            "main": {"temp": 12.1, "feels_like": 11.0, "temp_min": 11.5, "temp_max": 12.9,
                     "pressure": 1016, "humidity": 88},
            "wind": {"speed": 7.2, "deg": 310},
            "clouds": {"all": 90},
            "dt": 1700000000,
            "sys": {"sunrise": 1, "sunset": 2},
            "id": 0,
            "name": "Gulf of Bothnia",
            "cod": 200
        }"#;

        let snapshot: WeatherSnapshot = serde_json::from_str(body).expect("valid payload");
        assert_eq!(snapshot.sys.country, "");
        assert_eq!(snapshot.location(), "Gulf of Bothnia");

        let entry = HistoryEntry::from_snapshot(&snapshot, Utc::now());
        assert_eq!(entry.country_filter(), None);
        assert_eq!(entry.location(), "Gulf of Bothnia");
    }

    #[test]
    fn location_and_country_filter_with_country() {
        let entry = HistoryEntry::from_snapshot(&snapshot("Paris", "FR"), Utc::now());
        assert_eq!(entry.country_filter(), Some("FR"));
        assert_eq!(entry.location(), "Paris, FR");
        assert_eq!(snapshot("Paris", "FR").location(), "Paris, FR");
    }

    #[test]
    fn parses_openweather_payload() {
        let body = r#"{
            "coord": {"lon": 103.85, "lat": 1.29},
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds",
                         "icon": "04d"}],
            "base": "stations",
            "main": {"temp": 30.2, "feels_like": 35.1, "temp_min": 29.0, "temp_max": 31.4,
                     "pressure": 1008, "humidity": 70},
            "visibility": 10000,
            "wind": {"speed": 4.12, "deg": 150},
            "clouds": {"all": 75},
            "dt": 1700000000,
            "sys": {"type": 1, "id": 9470, "country": "SG",
                    "sunrise": 1699999000, "sunset": 1700042000},
            "timezone": 28800,
            "id": 1880252,
            "name": "Singapore",
            "cod": 200
        }"#;

        let snapshot: WeatherSnapshot = serde_json::from_str(body).expect("valid payload");
        assert_eq!(snapshot.name, "Singapore");
        assert_eq!(snapshot.sys.country, "SG");
        assert_eq!(snapshot.main.humidity, 70.0);
        assert_eq!(snapshot.primary_condition().map(|c| c.icon.as_str()), Some("04d"));
        assert_eq!(snapshot.observed_at().map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn entry_takes_city_and_country_from_response() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let entry = HistoryEntry::from_snapshot(&snapshot("Singapore", "SG"), now);

        assert_eq!(entry.city, "Singapore");
        assert_eq!(entry.country, "SG");
        assert_eq!(entry.timestamp, now);
        assert!(entry.id.starts_with(&now.timestamp_millis().to_string()));
        assert!(entry.weather_data.is_some());
    }

    #[test]
    fn entry_serializes_timestamp_as_iso_string() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let entry = HistoryEntry::from_snapshot(&snapshot("Oslo", "NO"), now);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["timestamp"], "2024-01-02T03:04:05Z");
        assert_eq!(json["weatherData"]["sys"]["country"], "NO");

        let back: HistoryEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn entry_ids_are_distinct_for_same_instant() {
        let now = Utc::now();
        assert_ne!(next_entry_id(now), next_entry_id(now));
    }
}
