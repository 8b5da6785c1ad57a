use std::sync::Arc;

use anyhow::Context;
use travelplanner::{TravelPlannerConfig, TripPlanner, telemetry, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = TravelPlannerConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.logging)?;

    let planner = TripPlanner::from_config(&config).context("Failed to set up trip planner")?;
    web::run(&config.server, Arc::new(planner)).await
}
