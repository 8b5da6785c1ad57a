use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::{TravelPlannerError, VERSION, models::TripPlan, planner::TripPlanner};

const SERVICE_NAME: &str = "Multi-Source Travel Planner API";

#[derive(Debug, Deserialize)]
pub struct TripParams {
    pub city: String,
    pub days: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct HealthStatus {
    pub message: String,
    pub version: String,
    pub status: String,
}

#[derive(Serialize, Deserialize)]
pub struct Invalidated {
    pub removed: bool,
}

/// Error body for the HTTP surface: `{"error": ..., "status_code": ...}`
pub struct ApiError(TravelPlannerError);

impl From<TravelPlannerError> for ApiError {
    fn from(e: TravelPlannerError) -> Self {
        Self(e)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(TravelPlannerError::invalid_request(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if !self.0.is_user_facing() {
            error!("Unexpected error reached the API: {}", self.0);
        }
        let status = match &self.0 {
            TravelPlannerError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            TravelPlannerError::LocationNotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = json!({
            "error": self.0.user_message(),
            "status_code": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

pub fn router(planner: Arc<TripPlanner>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trip", get(get_trip))
        .route("/trip/cache", delete(invalidate_trip))
        .with_state(planner)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        message: SERVICE_NAME.to_string(),
        version: VERSION.to_string(),
        status: "online".to_string(),
    })
}

async fn get_trip(
    State(planner): State<Arc<TripPlanner>>,
    params: Result<Query<TripParams>, QueryRejection>,
) -> Result<Json<TripPlan>, ApiError> {
    let Query(params) = params?;
    let days = params
        .days
        .unwrap_or_else(|| planner.settings().default_days.into());
    let plan = planner.plan_trip(&params.city, days).await?;
    Ok(Json(plan))
}

async fn invalidate_trip(
    State(planner): State<Arc<TripPlanner>>,
    params: Result<Query<TripParams>, QueryRejection>,
) -> Result<Json<Invalidated>, ApiError> {
    let Query(params) = params?;
    let days = params
        .days
        .unwrap_or_else(|| planner.settings().default_days.into());
    let removed = planner.invalidate(&params.city, days).await?;
    Ok(Json(Invalidated { removed }))
}
