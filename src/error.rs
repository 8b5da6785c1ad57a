//! Error types and handling for the travel planner

use thiserror::Error;

/// Main error type for the travel planner
#[derive(Error, Debug)]
pub enum TravelPlannerError {
    /// Malformed request (empty city, control characters, ...)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Geocoding definitively failed for the requested city
    #[error("Location not found: {city}")]
    LocationNotFound { city: String },

    /// An upstream provider failed, timed out or returned garbage
    #[error("{provider} unavailable: {message}")]
    SourceUnavailable {
        provider: &'static str,
        message: String,
    },

    /// Cache store could not be reached or decoded
    #[error("Cache unavailable: {message}")]
    CacheUnavailable { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl TravelPlannerError {
    /// Create a new invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new location not found error
    pub fn location_not_found<S: Into<String>>(city: S) -> Self {
        Self::LocationNotFound { city: city.into() }
    }

    /// Create a new source unavailable error
    pub fn source_unavailable<S: Into<String>>(provider: &'static str, message: S) -> Self {
        Self::SourceUnavailable {
            provider,
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::CacheUnavailable {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error is one the caller is allowed to see
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            TravelPlannerError::InvalidRequest { .. } | TravelPlannerError::LocationNotFound { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelPlannerError::InvalidRequest { message } => {
                format!("Invalid request: {message}")
            }
            TravelPlannerError::LocationNotFound { city } => {
                format!("City '{city}' not found. Please check the spelling and try again.")
            }
            TravelPlannerError::SourceUnavailable { .. } => {
                "Unable to connect to external services. Please try again later.".to_string()
            }
            TravelPlannerError::CacheUnavailable { .. } => {
                "Cache operation failed.".to_string()
            }
            TravelPlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
        }
    }
}
