pub mod aggregate;
pub mod breakdown;
pub mod filter;
pub mod metrics;
pub mod profile;

pub use aggregate::{aggregate_total, with_temperature, SeriesPoint};
pub use filter::apply_filters;
pub use metrics::{all_metrics, compute_metrics, dominant_component, overview_combinations};
