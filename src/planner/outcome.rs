//! Supervised source fetches and the fallback that turns them into plan sections

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinError;
use tracing::warn;

use crate::Result;
use crate::models::{Attraction, ForecastDay, Location, TripPlan};
use crate::providers::{RawForecast, RawPlace};

use super::clustering::DistanceBands;
use super::normalize;

/// Why a source produced nothing
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    Timeout(Duration),
    Error(String),
    /// The task panicked or was cancelled
    Aborted(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Timeout(limit) => write!(f, "timed out after {limit:?}"),
            FailureReason::Error(message) => write!(f, "{message}"),
            FailureReason::Aborted(message) => write!(f, "task aborted: {message}"),
        }
    }
}

/// Result of one supervised source fetch
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome<T> {
    Ready(T),
    Unavailable {
        provider: &'static str,
        reason: FailureReason,
    },
}

impl<T> SourceOutcome<T> {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, SourceOutcome::Ready(_))
    }

    /// Outcome of a spawned task that was joined
    pub fn from_join(provider: &'static str, joined: std::result::Result<Self, JoinError>) -> Self {
        joined.unwrap_or_else(|e| SourceOutcome::Unavailable {
            provider,
            reason: FailureReason::Aborted(e.to_string()),
        })
    }

    /// Feed a ready value through a fallible step; its error makes the
    /// source unavailable
    fn and_then<U>(
        self,
        provider: &'static str,
        f: impl FnOnce(T) -> Result<U>,
    ) -> SourceOutcome<U> {
        match self {
            SourceOutcome::Ready(value) => match f(value) {
                Ok(next) => SourceOutcome::Ready(next),
                Err(e) => SourceOutcome::Unavailable {
                    provider,
                    reason: FailureReason::Error(e.to_string()),
                },
            },
            SourceOutcome::Unavailable { provider, reason } => {
                SourceOutcome::Unavailable { provider, reason }
            }
        }
    }
}

impl<T: Default> SourceOutcome<T> {
    /// The ready value, or the section's empty value after logging why
    fn into_section(self) -> T {
        match self {
            SourceOutcome::Ready(value) => value,
            SourceOutcome::Unavailable { provider, reason } => {
                warn!("{} source unavailable, using empty section: {}", provider, reason);
                T::default()
            }
        }
    }
}

/// Run one adapter call under `limit`, tagging the outcome
pub async fn supervise<T, F>(provider: &'static str, limit: Duration, fut: F) -> SourceOutcome<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => SourceOutcome::Ready(value),
        Ok(Err(e)) => SourceOutcome::Unavailable {
            provider,
            reason: FailureReason::Error(e.to_string()),
        },
        Err(_) => SourceOutcome::Unavailable {
            provider,
            reason: FailureReason::Timeout(limit),
        },
    }
}

/// Everything the composition step needs besides the raw outcomes
pub struct Composition<'a> {
    pub location: Location,
    pub days: u8,
    pub top_attractions: usize,
    pub bands: &'a DistanceBands,
}

/// Build the plan from both outcomes; an unavailable or unusable source
/// becomes its section's empty value and never fails the plan.
#[must_use]
pub fn compose(
    ctx: Composition<'_>,
    weather: SourceOutcome<RawForecast>,
    places: SourceOutcome<Vec<RawPlace>>,
) -> TripPlan {
    let weather_forecast: Vec<ForecastDay> = weather
        .and_then("weather", |raw| normalize::daily_forecast(&raw, ctx.days))
        .into_section();

    let top_attractions: Vec<Attraction> = places
        .and_then("places", |raw| {
            let found = normalize::attractions(raw, &ctx.location);
            Ok(normalize::rank(found, ctx.top_attractions))
        })
        .into_section();
    let travel_notes = ctx.bands.cluster(&top_attractions);

    let mut plan = TripPlan::location_only(ctx.location, ctx.days);
    plan.weather_forecast = weather_forecast;
    plan.top_attractions = top_attractions;
    plan.travel_notes = travel_notes;
    plan
}
