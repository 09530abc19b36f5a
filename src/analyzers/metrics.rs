use std::collections::BTreeMap;

use crate::models::{Industry, MetricsResult, RecordTable, Region};
use crate::readers::DatasetStore;
use crate::utils::constants::{
    DATE_COLUMN, ENERGY_COMPONENTS, HOUR_COLUMN, TOTAL_COLUMN, WEEKEND_COLUMN,
};

/// Compute the dashboard summary card metrics for one combination.
///
/// Every field degrades independently: a missing column or empty table
/// zeroes that field (or sets it to "N/A") and leaves the rest intact.
/// `None` stands for a failed load and yields the all-defaults record.
pub fn compute_metrics(
    region: Region,
    industry: Industry,
    table: Option<&RecordTable>,
) -> MetricsResult {
    let table = match table {
        Some(t) => t,
        None => return MetricsResult::empty(region, industry),
    };

    let mut metrics = MetricsResult::empty(region, industry);
    metrics.total_records = table.num_rows();

    if let Some(total) = table.column(TOTAL_COLUMN) {
        metrics.avg_energy = total.mean();
        metrics.peak_hour = peak_hour(table).unwrap_or(0);
        let (weekend, weekday) = weekend_split(table);
        metrics.weekend_avg = weekend;
        metrics.weekday_avg = weekday;
    }

    if let Some(range) = date_range(table) {
        metrics.date_range = range;
    }
    metrics.dominant_component = dominant_component(table);

    metrics
}

/// Hour of day with the highest mean `Total`. BTreeMap iteration is hour
/// ascending and the comparison is strict, so ties go to the smallest hour.
fn peak_hour(table: &RecordTable) -> Option<u32> {
    let hour_col = table.column(HOUR_COLUMN)?;
    let total_col = table.column(TOTAL_COLUMN)?;

    let mut acc: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for row in 0..table.num_rows() {
        if let (Some(hour), Some(total)) = (hour_col.numeric_at(row), total_col.numeric_at(row)) {
            if hour < 0.0 {
                continue;
            }
            let entry = acc.entry(hour as u32).or_insert((0.0, 0));
            entry.0 += total;
            entry.1 += 1;
        }
    }

    let mut best: Option<(u32, f64)> = None;
    for (hour, (sum, count)) in acc {
        let mean = sum / count as f64;
        if best.map_or(true, |(_, best_mean)| mean > best_mean) {
            best = Some((hour, mean));
        }
    }
    best.map(|(hour, _)| hour)
}

/// (weekend mean, weekday mean) of `Total`, zeros when unavailable
fn weekend_split(table: &RecordTable) -> (f64, f64) {
    let weekend_col = match table.column(WEEKEND_COLUMN) {
        Some(col) => col,
        None => return (0.0, 0.0),
    };
    let total_col = match table.column(TOTAL_COLUMN) {
        Some(col) => col,
        None => return (0.0, 0.0),
    };

    let mut weekend = (0.0, 0usize);
    let mut weekday = (0.0, 0usize);
    for row in 0..table.num_rows() {
        let (flag, total) = match (weekend_col.bool_at(row), total_col.numeric_at(row)) {
            (Some(f), Some(t)) => (f, t),
            _ => continue,
        };
        let acc = if flag { &mut weekend } else { &mut weekday };
        acc.0 += total;
        acc.1 += 1;
    }

    let mean = |(sum, count): (f64, usize)| if count == 0 { 0.0 } else { sum / count as f64 };
    (mean(weekend), mean(weekday))
}

/// `"{min} to {max}"` over non-null dates, `None` when there are none
fn date_range(table: &RecordTable) -> Option<String> {
    let date_col = table.column(DATE_COLUMN)?;
    let mut min = None;
    let mut max = None;
    for row in 0..table.num_rows() {
        if let Some(date) = date_col.date_at(row) {
            min = Some(min.map_or(date, |m: chrono::NaiveDate| m.min(date)));
            max = Some(max.map_or(date, |m: chrono::NaiveDate| m.max(date)));
        }
    }
    Some(format!("{} to {}", min?, max?))
}

/// Component with the largest column sum among the fixed candidates,
/// in candidate order so ties keep the first-listed component
pub fn dominant_component(table: &RecordTable) -> String {
    let mut best: Option<(&str, f64)> = None;
    for name in ENERGY_COMPONENTS {
        if let Some(col) = table.column(name) {
            let sum = col.sum();
            if best.map_or(true, |(_, best_sum)| sum > best_sum) {
                best = Some((name, sum));
            }
        }
    }
    best.map(|(name, _)| name.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Metrics for every given (region, industry) combination, in input order.
///
/// Each slot is computed independently; a combination whose data cannot
/// be loaded gets the all-defaults record without disturbing the rest.
pub fn all_metrics(
    store: &DatasetStore,
    combinations: &[(Region, Industry)],
) -> Vec<MetricsResult> {
    combinations
        .iter()
        .map(|&(region, industry)| {
            let table = store.load_dataset(region, industry);
            compute_metrics(region, industry, table.as_deref())
        })
        .collect()
}

/// The six overview-card combinations, regions × (Transport, Warehouse, All)
pub fn overview_combinations() -> Vec<(Region, Industry)> {
    let mut combos = Vec::with_capacity(6);
    for region in Region::ALL {
        for industry in [Industry::Transport, Industry::Warehouse, Industry::All] {
            combos.push((region, industry));
        }
    }
    combos
}
