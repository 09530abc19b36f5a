/// Default root for processed dashboard datasets
pub const DEFAULT_DATA_DIR: &str = "data/processed";

/// Conventional column names
pub const DATE_COLUMN: &str = "Date";
pub const TOTAL_COLUMN: &str = "Total";
pub const HOUR_COLUMN: &str = "hour";
pub const WEEKDAY_COLUMN: &str = "weekday";
pub const MONTH_COLUMN: &str = "month";
pub const WEEKEND_COLUMN: &str = "is_weekend";
pub const INDUSTRY_COLUMN: &str = "Industry";

/// Categorical columns produced by the upstream classifiers
pub const LOAD_SIGNATURE_COLUMN: &str = "load_signature_class";
pub const CLUSTER_COLUMN: &str = "cluster_class";

/// One-hot / flag column prefixes
pub const BUILDING_TYPE_PREFIX: &str = "Building Type";
pub const FLOOR_AREA_PREFIX: &str = "Floor Area";
pub const CONTRACT_POWER_PREFIX: &str = "Contract Power";

/// Energy component columns, in fixed candidate order. The order is the
/// tie-break for dominant-component selection, so it must not change.
pub const ENERGY_COMPONENTS: [&str; 6] =
    ["AC", "Lighting", "Power", "Lamp", "Refrigeration", "Other"];

/// Business hours used for the peak vs off-peak split (inclusive)
pub const PEAK_HOUR_START: u32 = 8;
pub const PEAK_HOUR_END: u32 = 18;

/// Parquet writer defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_READ_BATCH_SIZE: usize = 8192;
