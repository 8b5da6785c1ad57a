//! Points of interest and their distance grouping

use serde::{Deserialize, Serialize};

/// Point of interest near the destination
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Attraction {
    pub name: String,
    pub category: String,
    /// Distance from the city coordinate in km
    pub distance: Option<f64>,
    pub address: Option<String>,
    pub rating: Option<f64>,
}

/// Attractions that fall into one distance band
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DistanceCluster {
    /// e.g. "Within 2km"
    pub cluster_name: String,
    pub count: usize,
    pub attractions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TravelNotes {
    pub distance_clusters: Vec<DistanceCluster>,
    pub total_attractions: usize,
}
