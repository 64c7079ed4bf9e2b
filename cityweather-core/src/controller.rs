//! Owns [`AppState`] and drives the fetch lifecycle.
//!
//! A fetch is split in two so callers can keep rendering while the request
//! runs: [`WeatherController::begin_fetch`] flips the state to loading and
//! hands out a [`FetchTicket`]; [`WeatherController::complete_fetch`] applies
//! the outcome. Starting a new fetch supersedes the previous one, whose
//! completion is then discarded.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    error::{ApiError, LocationError},
    location::{LocationLatch, LocationResolver},
    model::WeatherData,
    provider::WeatherProvider,
    state::{AppState, FetchPhase},
    store::CityStore,
};

/// Identifies one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    id: u64,
    city: String,
}

impl FetchTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Trimmed city the request is for.
    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug)]
pub struct WeatherController {
    state: AppState,
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn CityStore>,
    latest_ticket: u64,
}

impl WeatherController {
    pub fn new(provider: Arc<dyn WeatherProvider>, store: Arc<dyn CityStore>) -> Self {
        Self {
            state: AppState::default(),
            provider,
            store,
            latest_ticket: 0,
        }
    }

    /// Seed the search text from the last successful lookup, if one was saved.
    pub fn restore(provider: Arc<dyn WeatherProvider>, store: Arc<dyn CityStore>) -> Self {
        let mut controller = Self::new(provider, store);
        match controller.store.load_last_city() {
            Ok(Some(city)) => {
                debug!(%city, "restored last searched city");
                controller.state.search_city = city;
            }
            Ok(None) => {}
            Err(e) => warn!("could not read last searched city: {e:#}"),
        }
        controller
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn provider(&self) -> Arc<dyn WeatherProvider> {
        Arc::clone(&self.provider)
    }

    pub fn set_search_city(&mut self, city: impl Into<String>) {
        self.state.search_city = city.into();
    }

    pub fn dismiss_error(&mut self) {
        self.state.error_message = None;
    }

    pub fn set_error_message(&mut self, message: impl Into<String>) {
        self.state.error_message = Some(message.into());
    }

    /// Mark a request as in flight. Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        if self.state.loading {
            debug!(superseded = self.latest_ticket, "restarting in-flight fetch");
        }
        self.latest_ticket += 1;
        self.state.loading = true;
        self.state.phase = FetchPhase::Loading;

        FetchTicket {
            id: self.latest_ticket,
            city: self.state.query().to_string(),
        }
    }

    /// Apply a finished request. Returns `false` if the ticket was superseded
    /// and the outcome ignored.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<WeatherData, ApiError>,
    ) -> bool {
        if ticket.id != self.latest_ticket {
            debug!(
                ticket = ticket.id,
                latest = self.latest_ticket,
                "discarding superseded fetch"
            );
            return false;
        }

        match result {
            Ok(data) => {
                info!(city = %ticket.city, name = %data.name, "weather loaded");
                self.state.last_result = Some(data);
                self.state.error_message = None;
                self.state.phase = FetchPhase::Success;

                if let Err(e) = self.store.save_last_city(&ticket.city) {
                    warn!("could not persist last searched city: {e:#}");
                }
            }
            Err(err) => {
                info!(city = %ticket.city, "weather fetch failed: {err}");
                self.state.error_message = Some(err.user_message());
                self.state.phase = FetchPhase::Failed;
            }
        }
        self.state.loading = false;
        true
    }

    /// Fetch weather for the current search text and wait for the outcome.
    pub async fn fetch(&mut self) {
        let ticket = self.begin_fetch();
        let provider = self.provider();
        let result = provider.fetch_weather(ticket.city()).await;
        self.complete_fetch(ticket, result);
    }

    /// Apply a location outcome. Returns `true` when a city was taken over
    /// and a fetch should follow.
    pub fn apply_location(
        &mut self,
        latch: &LocationLatch,
        outcome: Result<Option<String>, LocationError>,
    ) -> bool {
        match outcome {
            Err(e) => {
                self.set_error_message(e.user_message());
                false
            }
            Ok(None) => false,
            Ok(Some(city)) => {
                if !latch.try_claim() {
                    debug!(%city, "location already applied, ignoring");
                    return false;
                }
                self.set_search_city(city);
                true
            }
        }
    }

    /// Resolve the current city and, if found, fetch its weather.
    pub async fn locate(
        &mut self,
        resolver: &dyn LocationResolver,
        latch: &LocationLatch,
    ) -> bool {
        if latch.is_claimed() {
            return false;
        }
        let outcome = resolver.resolve_current_city_best_effort().await;
        let found = self.apply_location(latch, outcome);
        if found {
            self.fetch().await;
        }
        found
    }
}
