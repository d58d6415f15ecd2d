use crate::{Config, WeatherQuery, WeatherSnapshot, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Source of current weather observations.
///
/// Failures that came from the provider are returned as [`crate::WeatherError`] inside the
/// `anyhow::Error`, so callers can pick the right user-facing message.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, query: &WeatherQuery) -> anyhow::Result<WeatherSnapshot>;
}

#[async_trait]
impl<P: WeatherProvider + ?Sized> WeatherProvider for Box<P> {
    async fn fetch_current(&self, query: &WeatherQuery) -> anyhow::Result<WeatherSnapshot> {
        (**self).fetch_current(query).await
    }
}

#[async_trait]
impl<P: WeatherProvider + ?Sized> WeatherProvider for Arc<P> {
    async fn fetch_current(&self, query: &WeatherQuery) -> anyhow::Result<WeatherSnapshot> {
        (**self).fetch_current(query).await
    }
}

/// Construct the provider described by the config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    Ok(Box::new(OpenWeatherProvider::from_config(config)?))
}
