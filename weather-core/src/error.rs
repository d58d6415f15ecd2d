use reqwest::StatusCode;
use thiserror::Error;

/// Shown for any failure that did not come from the weather provider.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Classified failure of a weather lookup. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("City not found. Please check again.")]
    NotFound,

    #[error("API key is invalid or missing.")]
    Unauthorized,

    #[error("Too many requests. Please try again later.")]
    RateLimited,

    /// Any other provider response: unexpected status or an unreadable body.
    #[error("Failed to fetch weather data. Please try again.")]
    Unknown { status: Option<u16> },

    /// The request never produced a response.
    #[error("Failed to fetch weather data. Please try again.")]
    NetworkFailure(String),
}

impl WeatherError {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => WeatherError::NotFound,
            StatusCode::UNAUTHORIZED => WeatherError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => WeatherError::RateLimited,
            other => WeatherError::Unknown {
                status: Some(other.as_u16()),
            },
        }
    }
}

/// User-facing message for an error returned by a provider or the session plumbing.
pub fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<WeatherError>() {
        Some(weather_err) => weather_err.to_string(),
        None => UNEXPECTED_ERROR_MESSAGE.to_string(),
    }
}
