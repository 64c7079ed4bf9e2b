use thiserror::Error;

use crate::model::ErrorBody;

/// Classification of a failed fetch.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upstream answered with a non-2xx status and a structured error body.
    #[error("server returned {status}: {}", .body.message)]
    Server { status: u16, body: ErrorBody },

    /// No response reached us.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("{0}")]
    Unknown(String),
}

impl ApiError {
    /// Text shown to the user for this classification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { .. } => "Server Error".to_string(),
            ApiError::Network(_) => {
                "Network Error, please check your internet connection".to_string()
            }
            ApiError::Unknown(diagnostic) => format!("Unknown Error: {diagnostic}"),
        }
    }
}

/// Failure of the location collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => {
                "Location permission denied, please allow for a better app experience"
            }
        }
    }
}
