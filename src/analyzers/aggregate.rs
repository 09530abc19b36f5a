use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::{RecordTable, TimeBucket};
use crate::utils::constants::{DATE_COLUMN, TOTAL_COLUMN};

/// One bucket of the aggregated consumption series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// First calendar date of the bucket (the date itself, the week's
    /// Monday, or the first of the month)
    pub period_start: NaiveDate,
    pub label: String,
    pub total: f64,
}

/// Sum the `Total` column per time bucket, chronologically ascending.
///
/// Weeks are ISO weeks starting Monday. Rows whose `Date` or `Total` cell
/// is null are left out; a table missing either column aggregates to an
/// empty series.
pub fn aggregate_total(table: &RecordTable, bucket: TimeBucket) -> Vec<SeriesPoint> {
    let date_col = match table.column(DATE_COLUMN) {
        Some(col) => col,
        None => return Vec::new(),
    };
    let total_col = match table.column(TOTAL_COLUMN) {
        Some(col) => col,
        None => return Vec::new(),
    };

    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in 0..table.num_rows() {
        let (date, total) = match (date_col.date_at(row), total_col.numeric_at(row)) {
            (Some(d), Some(t)) => (d, t),
            _ => continue,
        };
        *sums.entry(period_start(date, bucket)).or_insert(0.0) += total;
    }

    sums.into_iter()
        .map(|(start, total)| SeriesPoint {
            period_start: start,
            label: period_label(start, bucket),
            total,
        })
        .collect()
}

/// Bucket start for a date: the date itself, the Monday of its ISO week,
/// or the first of its month
fn period_start(date: NaiveDate, bucket: TimeBucket) -> NaiveDate {
    match bucket {
        TimeBucket::Daily => date,
        TimeBucket::Weekly => date.week(Weekday::Mon).first_day(),
        TimeBucket::Monthly => {
            NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
        }
    }
}

fn period_label(start: NaiveDate, bucket: TimeBucket) -> String {
    match bucket {
        TimeBucket::Daily => start.to_string(),
        TimeBucket::Weekly => {
            let iso = start.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
        TimeBucket::Monthly => format!("{}-{:02}", start.year(), start.month()),
    }
}

/// Attach mean daily temperature to a series for the chart overlay.
///
/// The temperature table carries lowercase `date`/`temperature` columns;
/// points without a matching temperature reading keep `None`, mirroring a
/// left join.
pub fn with_temperature(
    series: &[SeriesPoint],
    temperature: &RecordTable,
) -> Vec<(SeriesPoint, Option<f64>)> {
    let by_date = temperature_by_date(temperature);
    series
        .iter()
        .map(|point| (point.clone(), by_date.get(&point.period_start).copied()))
        .collect()
}

/// Mean temperature per calendar date
fn temperature_by_date(table: &RecordTable) -> BTreeMap<NaiveDate, f64> {
    let date_col = match table.column("date") {
        Some(col) => col,
        None => return BTreeMap::new(),
    };
    let temp_col = match table.column("temperature") {
        Some(col) => col,
        None => return BTreeMap::new(),
    };

    let mut acc: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for row in 0..table.num_rows() {
        if let (Some(date), Some(temp)) = (date_col.date_at(row), temp_col.numeric_at(row)) {
            let entry = acc.entry(date).or_insert((0.0, 0));
            entry.0 += temp;
            entry.1 += 1;
        }
    }
    acc.into_iter()
        .map(|(date, (sum, count))| (date, sum / count as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnValues;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table_with(dates: Vec<NaiveDate>, totals: Vec<f64>) -> RecordTable {
        let mut table = RecordTable::new();
        table
            .push_column("Date", ColumnValues::dates(dates))
            .unwrap();
        table
            .push_column("Total", ColumnValues::floats(totals))
            .unwrap();
        table
    }

    #[test]
    fn test_daily_keys_are_distinct_dates() {
        let table = table_with(
            vec![date(2013, 1, 2), date(2013, 1, 1), date(2013, 1, 2)],
            vec![5.0, 10.0, 7.0],
        );
        let series = aggregate_total(&table, TimeBucket::Daily);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].period_start, date(2013, 1, 1));
        assert_eq!(series[0].total, 10.0);
        assert_eq!(series[1].period_start, date(2013, 1, 2));
        assert_eq!(series[1].total, 12.0);
    }

    #[test]
    fn test_weekly_buckets_start_monday() {
        // 2013-01-01 is a Tuesday; its ISO week starts Monday 2012-12-31.
        // 2013-01-07 is the following Monday.
        let table = table_with(
            vec![date(2013, 1, 1), date(2013, 1, 6), date(2013, 1, 7)],
            vec![1.0, 2.0, 4.0],
        );
        let series = aggregate_total(&table, TimeBucket::Weekly);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].period_start, date(2012, 12, 31));
        assert_eq!(series[0].total, 3.0);
        assert_eq!(series[0].label, "2013-W01");
        assert_eq!(series[1].period_start, date(2013, 1, 7));
        assert_eq!(series[1].total, 4.0);
    }

    #[test]
    fn test_monthly_buckets() {
        let table = table_with(
            vec![date(2013, 1, 15), date(2013, 1, 28)],
            vec![10.0, 20.0],
        );
        let series = aggregate_total(&table, TimeBucket::Monthly);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "2013-01");
        assert_eq!(series[0].total, 30.0);
    }

    #[test]
    fn test_chronological_order_across_months() {
        let table = table_with(
            vec![date(2013, 3, 1), date(2013, 1, 1), date(2013, 2, 1)],
            vec![3.0, 1.0, 2.0],
        );
        let series = aggregate_total(&table, TimeBucket::Monthly);
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2013-01", "2013-02", "2013-03"]);
    }

    #[test]
    fn test_null_cells_are_excluded() {
        let mut table = RecordTable::new();
        table
            .push_column(
                "Date",
                ColumnValues::Date(vec![Some(date(2013, 1, 1)), None, Some(date(2013, 1, 1))]),
            )
            .unwrap();
        table
            .push_column(
                "Total",
                ColumnValues::Float(vec![Some(5.0), Some(100.0), None]),
            )
            .unwrap();
        let series = aggregate_total(&table, TimeBucket::Daily);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].total, 5.0);
    }

    #[test]
    fn test_missing_columns_yield_empty_series() {
        let mut no_total = RecordTable::new();
        no_total
            .push_column("Date", ColumnValues::dates(vec![date(2013, 1, 1)]))
            .unwrap();
        assert!(aggregate_total(&no_total, TimeBucket::Daily).is_empty());

        let empty = RecordTable::new();
        assert!(aggregate_total(&empty, TimeBucket::Weekly).is_empty());
    }

    #[test]
    fn test_temperature_overlay_joins_on_period_start() {
        let consumption = table_with(vec![date(2013, 1, 1), date(2013, 1, 2)], vec![10.0, 20.0]);
        let series = aggregate_total(&consumption, TimeBucket::Daily);

        let mut temp = RecordTable::new();
        temp.push_column(
            "date",
            ColumnValues::dates(vec![date(2013, 1, 1), date(2013, 1, 1)]),
        )
        .unwrap();
        temp.push_column("temperature", ColumnValues::floats(vec![4.0, 6.0]))
            .unwrap();

        let overlaid = with_temperature(&series, &temp);
        assert_eq!(overlaid[0].1, Some(5.0));
        assert_eq!(overlaid[1].1, None);
    }
}
