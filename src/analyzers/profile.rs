use std::collections::BTreeMap;

use crate::models::RecordTable;
use crate::utils::constants::{
    HOUR_COLUMN, MONTH_COLUMN, PEAK_HOUR_END, PEAK_HOUR_START, TOTAL_COLUMN, WEEKDAY_COLUMN,
};

/// Mean of `Total` grouped by an integer key column, key ascending
fn mean_by_key(table: &RecordTable, key_column: &str) -> Vec<(u32, f64)> {
    grouped(table, key_column)
        .into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

fn grouped(table: &RecordTable, key_column: &str) -> BTreeMap<u32, (f64, usize)> {
    let mut acc = BTreeMap::new();
    let (key_col, total_col) = match (table.column(key_column), table.column(TOTAL_COLUMN)) {
        (Some(k), Some(t)) => (k, t),
        _ => return acc,
    };
    for row in 0..table.num_rows() {
        if let (Some(key), Some(total)) = (key_col.numeric_at(row), total_col.numeric_at(row)) {
            if key < 0.0 {
                continue;
            }
            let entry = acc.entry(key as u32).or_insert((0.0, 0));
            entry.0 += total;
            entry.1 += 1;
        }
    }
    acc
}

/// Average consumption per hour of day (0-23), for the hourly pattern chart
pub fn hourly_profile(table: &RecordTable) -> Vec<(u32, f64)> {
    mean_by_key(table, HOUR_COLUMN)
}

/// Average consumption per weekday (0 = Monday .. 6 = Sunday)
pub fn weekday_profile(table: &RecordTable) -> Vec<(u32, f64)> {
    mean_by_key(table, WEEKDAY_COLUMN)
}

/// Summed consumption per calendar month number (1-12)
pub fn monthly_totals(table: &RecordTable) -> Vec<(u32, f64)> {
    grouped(table, MONTH_COLUMN)
        .into_iter()
        .map(|(key, (sum, _))| (key, sum))
        .collect()
}

/// Mean consumption inside and outside business hours (8..=18).
/// Returns (peak mean, off-peak mean), zeros when data is missing.
pub fn peak_offpeak(table: &RecordTable) -> (f64, f64) {
    let (hour_col, total_col) = match (table.column(HOUR_COLUMN), table.column(TOTAL_COLUMN)) {
        (Some(h), Some(t)) => (h, t),
        _ => return (0.0, 0.0),
    };

    let mut peak = (0.0, 0usize);
    let mut off_peak = (0.0, 0usize);
    for row in 0..table.num_rows() {
        let (hour, total) = match (hour_col.numeric_at(row), total_col.numeric_at(row)) {
            (Some(h), Some(t)) => (h, t),
            _ => continue,
        };
        let in_peak = hour >= PEAK_HOUR_START as f64 && hour <= PEAK_HOUR_END as f64;
        let acc = if in_peak { &mut peak } else { &mut off_peak };
        acc.0 += total;
        acc.1 += 1;
    }

    let mean = |(sum, count): (f64, usize)| if count == 0 { 0.0 } else { sum / count as f64 };
    (mean(peak), mean(off_peak))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnValues;

    fn table_with_hours(hours: Vec<i64>, totals: Vec<f64>) -> RecordTable {
        let mut table = RecordTable::new();
        table
            .push_column(HOUR_COLUMN, ColumnValues::ints(hours))
            .unwrap();
        table
            .push_column(TOTAL_COLUMN, ColumnValues::floats(totals))
            .unwrap();
        table
    }

    #[test]
    fn test_hourly_profile_means_ascending() {
        let table = table_with_hours(vec![14, 9, 9], vec![30.0, 10.0, 20.0]);
        let profile = hourly_profile(&table);
        assert_eq!(profile, vec![(9, 15.0), (14, 30.0)]);
    }

    #[test]
    fn test_weekday_profile_missing_column_is_empty() {
        let table = table_with_hours(vec![9], vec![10.0]);
        assert!(weekday_profile(&table).is_empty());
    }

    #[test]
    fn test_monthly_totals_sum_not_mean() {
        let mut table = RecordTable::new();
        table
            .push_column(MONTH_COLUMN, ColumnValues::ints(vec![1, 1, 2]))
            .unwrap();
        table
            .push_column(TOTAL_COLUMN, ColumnValues::floats(vec![5.0, 7.0, 3.0]))
            .unwrap();
        assert_eq!(monthly_totals(&table), vec![(1, 12.0), (2, 3.0)]);
    }

    #[test]
    fn test_peak_offpeak_split() {
        // Hours 8 and 18 are inside the peak window, 7 and 19 outside
        let table = table_with_hours(vec![8, 18, 7, 19], vec![10.0, 30.0, 2.0, 4.0]);
        let (peak, off_peak) = peak_offpeak(&table);
        assert_eq!(peak, 20.0);
        assert_eq!(off_peak, 3.0);
    }

    #[test]
    fn test_peak_offpeak_without_data() {
        assert_eq!(peak_offpeak(&RecordTable::new()), (0.0, 0.0));
    }
}
