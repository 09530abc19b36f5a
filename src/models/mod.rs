pub mod dataset;
pub mod metrics;
pub mod table;

pub use dataset::{BuildingType, FilterCriteria, Industry, Region, TimeBucket};
pub use metrics::MetricsResult;
pub use table::{Column, ColumnValues, RecordTable};
