use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::utils::constants::BUILDING_TYPE_PREFIX;

/// Geographic partition of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Kansai,
    Kanto,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::Kansai, Region::Kanto];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Kansai => "Kansai",
            Region::Kanto => "Kanto",
        }
    }

    /// Lowercase form used in file names
    pub fn as_key(&self) -> &'static str {
        match self {
            Region::Kansai => "kansai",
            Region::Kanto => "kanto",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kansai" => Ok(Region::Kansai),
            "kanto" => Ok(Region::Kanto),
            _ => Err(AnalyticsError::UnknownRegion(s.to_string())),
        }
    }
}

/// Facility category. `All` combines Transport and Warehouse at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Industry {
    Transport,
    Warehouse,
    All,
}

impl Industry {
    /// The two concrete industries, without the synthetic `All`
    pub const CONCRETE: [Industry; 2] = [Industry::Transport, Industry::Warehouse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Transport => "Transport",
            Industry::Warehouse => "Warehouse",
            Industry::All => "All",
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            Industry::Transport => "transport",
            Industry::Warehouse => "warehouse",
            Industry::All => "all",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "transport" => Ok(Industry::Transport),
            "warehouse" => Ok(Industry::Warehouse),
            "all" => Ok(Industry::All),
            _ => Err(AnalyticsError::UnknownIndustry(s.to_string())),
        }
    }
}

/// Time-series grouping granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeBucket {
    Daily,
    Weekly,
    Monthly,
}

impl TimeBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBucket::Daily => "Daily",
            TimeBucket::Weekly => "Weekly",
            TimeBucket::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeBucket {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(TimeBucket::Daily),
            "weekly" => Ok(TimeBucket::Weekly),
            "monthly" => Ok(TimeBucket::Monthly),
            _ => Err(AnalyticsError::UnknownBucket(s.to_string())),
        }
    }
}

/// Building-type selector. Non-`All` variants correspond to the one-hot
/// columns `Building Type_Single Building` / `Building Type_Tenant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BuildingType {
    #[default]
    All,
    SingleBuilding,
    Tenant,
}

impl BuildingType {
    pub fn label(&self) -> &'static str {
        match self {
            BuildingType::All => "All",
            BuildingType::SingleBuilding => "Single Building",
            BuildingType::Tenant => "Tenant",
        }
    }

    /// One-hot column this selector keys on, none for `All`
    pub fn column_name(&self) -> Option<String> {
        match self {
            BuildingType::All => None,
            _ => Some(format!("{}_{}", BUILDING_TYPE_PREFIX, self.label())),
        }
    }
}

impl FromStr for BuildingType {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "all" => Ok(BuildingType::All),
            "single building" | "singlebuilding" | "single" => Ok(BuildingType::SingleBuilding),
            "tenant" => Ok(BuildingType::Tenant),
            _ => Err(AnalyticsError::InvalidFormat(format!(
                "unknown building type: {}",
                s
            ))),
        }
    }
}

/// One user interaction's worth of filter constraints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub building_type: BuildingType,
    pub min_total: Option<f64>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_building_type(mut self, building_type: BuildingType) -> Self {
        self.building_type = building_type;
        self
    }

    pub fn with_min_total(mut self, min_total: f64) -> Self {
        self.min_total = Some(min_total);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_round_trip() {
        assert_eq!("kansai".parse::<Region>().unwrap(), Region::Kansai);
        assert_eq!("Kanto".parse::<Region>().unwrap(), Region::Kanto);
        assert!("tohoku".parse::<Region>().is_err());
        assert_eq!(Region::Kansai.as_key(), "kansai");
    }

    #[test]
    fn test_industry_parsing() {
        assert_eq!(
            "Warehouse".parse::<Industry>().unwrap(),
            Industry::Warehouse
        );
        assert_eq!("all".parse::<Industry>().unwrap(), Industry::All);
        assert!("retail".parse::<Industry>().is_err());
    }

    #[test]
    fn test_building_type_column_names() {
        assert_eq!(BuildingType::All.column_name(), None);
        assert_eq!(
            BuildingType::SingleBuilding.column_name().unwrap(),
            "Building Type_Single Building"
        );
        assert_eq!(
            BuildingType::Tenant.column_name().unwrap(),
            "Building Type_Tenant"
        );
    }

    #[test]
    fn test_building_type_parsing_variants() {
        assert_eq!(
            "single-building".parse::<BuildingType>().unwrap(),
            BuildingType::SingleBuilding
        );
        assert_eq!(
            "Tenant".parse::<BuildingType>().unwrap(),
            BuildingType::Tenant
        );
    }

    #[test]
    fn test_criteria_builder() {
        let start = NaiveDate::from_ymd_opt(2013, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2013, 12, 31).unwrap();
        let criteria = FilterCriteria::new()
            .with_date_range(start, end)
            .with_building_type(BuildingType::Tenant)
            .with_min_total(5.0);
        assert_eq!(criteria.start_date, Some(start));
        assert_eq!(criteria.end_date, Some(end));
        assert_eq!(criteria.building_type, BuildingType::Tenant);
        assert_eq!(criteria.min_total, Some(5.0));
    }
}
