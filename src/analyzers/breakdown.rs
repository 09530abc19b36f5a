use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::RecordTable;
use crate::utils::constants::{DATE_COLUMN, ENERGY_COMPONENTS};

/// Column-wise sum of each energy component present in the table, in the
/// fixed candidate order. Feeds the component pie/bar charts.
pub fn component_totals(table: &RecordTable) -> Vec<(String, f64)> {
    ENERGY_COMPONENTS
        .iter()
        .filter_map(|&name| table.column(name).map(|col| (name.to_string(), col.sum())))
        .collect()
}

/// Per-date sums of every present component, for the stacked-area chart.
/// Returns the component names and one row of sums per distinct date,
/// dates ascending.
pub fn component_daily_series(table: &RecordTable) -> (Vec<String>, Vec<(NaiveDate, Vec<f64>)>) {
    let date_col = match table.column(DATE_COLUMN) {
        Some(col) => col,
        None => return (Vec::new(), Vec::new()),
    };
    let components: Vec<&str> = ENERGY_COMPONENTS
        .iter()
        .copied()
        .filter(|name| table.has_column(name))
        .collect();
    if components.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let mut acc: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for row in 0..table.num_rows() {
        let date = match date_col.date_at(row) {
            Some(d) => d,
            None => continue,
        };
        let sums = acc.entry(date).or_insert_with(|| vec![0.0; components.len()]);
        for (slot, name) in components.iter().enumerate() {
            if let Some(value) = table.column(name).and_then(|c| c.numeric_at(row)) {
                sums[slot] += value;
            }
        }
    }

    (
        components.iter().map(|s| s.to_string()).collect(),
        acc.into_iter().collect(),
    )
}

/// Value counts of a categorical column (load signature class, cluster
/// class), most frequent first; count ties sort by label for stable output
pub fn category_counts(table: &RecordTable, column: &str) -> Vec<(String, usize)> {
    let col = match table.column(column) {
        Some(col) => col,
        None => return Vec::new(),
    };

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in 0..table.num_rows() {
        if let Some(value) = col.display_at(row) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let mut out: Vec<(String, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Sums of all columns sharing a prefix, in table order. Covers the
/// `Floor Area_<X>` / `Contract Power_<X>` distribution charts.
pub fn prefix_column_sums(table: &RecordTable, prefix: &str) -> Vec<(String, f64)> {
    table
        .columns_with_prefix(prefix)
        .into_iter()
        .map(|col| (col.name().to_string(), col.sum()))
        .collect()
}
