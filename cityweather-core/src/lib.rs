//! Core library for the `cityweather` tool.
//!
//! This crate defines:
//! - Configuration and the persisted last-searched city
//! - The OpenWeather client and its error classification
//! - Application state and the controller that drives a fetch
//! - Best-effort current-location lookup
//! - Display formatting for raw upstream values
//!
//! It is used by `cityweather-cli`, but can also back other front ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod location;
pub mod model;
pub mod provider;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use controller::{FetchTicket, WeatherController};
pub use error::{ApiError, LocationError};
pub use location::{FixedLocation, IpLocationResolver, LocationLatch, LocationResolver};
pub use model::{Condition, ErrorBody, MainConditions, WeatherData};
pub use provider::{WeatherProvider, openweather::{OpenWeatherProvider, icon_url}};
pub use state::{AppState, FetchPhase};
pub use store::{CityStore, FileCityStore, MemoryCityStore};
