//! Best-effort resolution of the user's current city.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{
    fmt::Debug,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use tracing::{debug, warn};

use crate::{Config, error::LocationError};

#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    /// `Ok(None)` means no city could be determined; that is not an error.
    async fn resolve_current_city_best_effort(&self) -> Result<Option<String>, LocationError>;
}

/// Lets a resolved location be applied once per process.
#[derive(Debug, Default)]
pub struct LocationLatch {
    found: AtomicBool,
}

impl LocationLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` for the first caller only.
    pub fn try_claim(&self) -> bool {
        self.found
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_claimed(&self) -> bool {
        self.found.load(Ordering::Acquire)
    }
}

/// Reports a city chosen up front, e.g. from the command line.
#[derive(Debug, Clone)]
pub struct FixedLocation {
    city: String,
}

impl FixedLocation {
    pub fn new(city: &str) -> Self {
        Self {
            city: city.to_string(),
        }
    }
}

#[async_trait]
impl LocationResolver for FixedLocation {
    async fn resolve_current_city_best_effort(&self) -> Result<Option<String>, LocationError> {
        Ok(Some(self.city.clone()))
    }
}

#[derive(Debug, Deserialize)]
struct IpLookup {
    status: String,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region: Option<String>,
    country: Option<String>,
}

impl IpLookup {
    fn into_address(self) -> Option<String> {
        if self.status != "success" {
            return None;
        }
        let city = self.city.filter(|c| !c.trim().is_empty())?;
        let parts: Vec<String> = [Some(city), self.region, self.country]
            .into_iter()
            .flatten()
            .filter(|p| !p.trim().is_empty())
            .collect();
        Some(parts.join(", "))
    }
}

/// Locates the machine by its public IP address.
///
/// Permission is the `location_enabled` config flag.
#[derive(Debug, Clone)]
pub struct IpLocationResolver {
    endpoint: String,
    allowed: bool,
    http: Client,
}

impl IpLocationResolver {
    pub fn new(endpoint: &str, allowed: bool, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            allowed,
            http,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(&config.location_endpoint, config.location_enabled, config.timeout())
    }

    async fn lookup(&self) -> Result<IpLookup, reqwest::Error> {
        self.http
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl LocationResolver for IpLocationResolver {
    async fn resolve_current_city_best_effort(&self) -> Result<Option<String>, LocationError> {
        if !self.allowed {
            return Err(LocationError::PermissionDenied);
        }

        match self.lookup().await {
            Ok(found) => {
                let address = found.into_address();
                debug!(?address, "IP location lookup finished");
                Ok(address)
            }
            Err(e) => {
                warn!("IP location lookup failed: {e}");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CannedResponse, closed_port_url, serve_once};

    #[test]
    fn latch_claims_once() {
        let latch = LocationLatch::new();
        assert!(!latch.is_claimed());
        assert!(latch.try_claim());
        assert!(!latch.try_claim());
        assert!(latch.is_claimed());
    }

    #[test]
    fn lookup_joins_address_parts() {
        let body = r#"{
            "status": "success",
            "city": "Lyon",
            "regionName": "Auvergne-Rhone-Alpes",
            "country": "France"
        }"#;
        let found: IpLookup = serde_json::from_str(body).unwrap();
        assert_eq!(
            found.into_address().as_deref(),
            Some("Lyon, Auvergne-Rhone-Alpes, France")
        );

        let failed: IpLookup = serde_json::from_str(r#"{"status":"fail"}"#).unwrap();
        assert_eq!(failed.into_address(), None);
    }

    #[tokio::test]
    async fn disabled_resolver_reports_denial() {
        let resolver =
            IpLocationResolver::new("http://127.0.0.1:9/json", false, Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            resolver.resolve_current_city_best_effort().await,
            Err(LocationError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn enabled_resolver_returns_city() {
        let server = serve_once(CannedResponse::json(
            200,
            r#"{"status":"success","city":"Tokyo","country":"Japan"}"#,
        ))
        .await;
        let resolver =
            IpLocationResolver::new(&server.url, true, Duration::from_secs(5)).unwrap();

        let city = resolver.resolve_current_city_best_effort().await.unwrap();
        assert_eq!(city.as_deref(), Some("Tokyo, Japan"));
    }

    #[tokio::test]
    async fn unreachable_lookup_is_not_an_error() {
        let url = closed_port_url().await;
        let resolver = IpLocationResolver::new(&url, true, Duration::from_secs(5)).unwrap();
        assert_eq!(resolver.resolve_current_city_best_effort().await, Ok(None));
    }

    #[tokio::test]
    async fn fixed_location_reports_its_city() {
        let resolver = FixedLocation::new("Oslo");
        assert_eq!(
            resolver.resolve_current_city_best_effort().await,
            Ok(Some("Oslo".to_string()))
        );
    }
}
