use serde::{Deserialize, Serialize};

use super::{Industry, Region};

/// Summary metrics for one (region, industry) combination.
///
/// Produced fresh per request and never mutated. Every field has a
/// documented default so a failed or partial computation still yields a
/// complete record for the overview cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    pub region: Region,
    pub industry: Industry,
    pub total_records: usize,
    pub avg_energy: f64,
    pub peak_hour: u32,
    pub weekend_avg: f64,
    pub weekday_avg: f64,
    pub date_range: String,
    pub dominant_component: String,
}

impl MetricsResult {
    /// All-defaults record, used when a combination's data cannot be loaded
    pub fn empty(region: Region, industry: Industry) -> Self {
        Self {
            region,
            industry,
            total_records: 0,
            avg_energy: 0.0,
            peak_hour: 0,
            weekend_avg: 0.0,
            weekday_avg: 0.0,
            date_range: "N/A".to_string(),
            dominant_component: "N/A".to_string(),
        }
    }
}
