use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::{
    config::{DEFAULT_ENDPOINT, DEFAULT_IMAGE_BASE_URL},
    error::ApiError,
    model::{ErrorBody, WeatherData},
};

use super::WeatherProvider;

/// Image URL for an OpenWeather icon id on the default image host.
pub fn icon_url(icon: &str) -> String {
    icon_url_with_base(DEFAULT_IMAGE_BASE_URL, icon)
}

pub fn icon_url_with_base(base: &str, icon: &str) -> String {
    format!("{base}{icon}@2x.png")
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    image_base_url: String,
    http: Client,
}

#[derive(Debug)]
pub struct OpenWeatherProviderBuilder {
    api_key: String,
    endpoint: String,
    image_base_url: String,
    timeout: Option<Duration>,
}

impl OpenWeatherProviderBuilder {
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn image_base_url(mut self, base: &str) -> Self {
        self.image_base_url = base.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> anyhow::Result<OpenWeatherProvider> {
        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(OpenWeatherProvider {
            api_key: self.api_key,
            endpoint: self.endpoint,
            image_base_url: self.image_base_url,
            http: http.build().context("Failed to build HTTP client")?,
        })
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn builder(api_key: String) -> OpenWeatherProviderBuilder {
        OpenWeatherProviderBuilder {
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn icon_url(&self, icon: &str) -> String {
        icon_url_with_base(&self.image_base_url, icon)
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherData, ApiError> {
        debug!(city, endpoint = %self.endpoint, "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(classify_transport)?;

        let status = res.status();
        let body = res.text().await.map_err(classify_transport)?;

        debug!(%status, bytes = body.len(), "OpenWeather responded");

        if status.is_success() {
            return serde_json::from_str::<WeatherData>(&body).map_err(|e| {
                ApiError::Unknown(format!("Failed to parse OpenWeather current JSON: {e}"))
            });
        }

        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(body) => Err(ApiError::Server {
                status: status.as_u16(),
                body,
            }),
            Err(_) => Err(ApiError::Unknown(format!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ))),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherData, ApiError> {
        self.fetch_current(city).await
    }
}

/// Errors raised before a complete response arrived.
fn classify_transport(err: reqwest::Error) -> ApiError {
    if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
        ApiError::Network(err)
    } else {
        ApiError::Unknown(err.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
