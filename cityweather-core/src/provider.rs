use crate::{ApiError, Config, WeatherData, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions for a city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherData, ApiError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.resolve_api_key()?;
    OpenWeatherProvider::builder(api_key)
        .endpoint(&config.endpoint)
        .image_base_url(&config.image_base_url)
        .timeout(config.timeout())
        .build()
}
