use crate::model::WeatherData;

/// Where the request lifecycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

/// Everything the screen needs to render.
///
/// Read-only outside the crate; all writes go through
/// [`WeatherController`](crate::controller::WeatherController).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub(crate) search_city: String,
    pub(crate) loading: bool,
    pub(crate) last_result: Option<WeatherData>,
    pub(crate) error_message: Option<String>,
    pub(crate) phase: FetchPhase,
}

impl AppState {
    pub fn search_city(&self) -> &str {
        &self.search_city
    }

    /// The search text as it will be sent upstream.
    pub fn query(&self) -> &str {
        self.search_city.trim()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn last_result(&self) -> Option<&WeatherData> {
        self.last_result.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Inputs are disabled while a request is in flight.
    pub fn inputs_enabled(&self) -> bool {
        !self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_idle_and_empty() {
        let state = AppState::default();
        assert_eq!(state.phase(), FetchPhase::Idle);
        assert!(!state.loading());
        assert!(state.last_result().is_none());
        assert!(state.error_message().is_none());
        assert!(state.inputs_enabled());
    }

    #[test]
    fn query_is_trimmed_but_text_is_kept() {
        let state = AppState {
            search_city: "  New York \n".into(),
            ..AppState::default()
        };
        assert_eq!(state.search_city(), "  New York \n");
        assert_eq!(state.query(), "New York");
    }
}
