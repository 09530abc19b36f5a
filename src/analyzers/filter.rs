use crate::models::{FilterCriteria, RecordTable};
use crate::utils::constants::{DATE_COLUMN, TOTAL_COLUMN};

/// Apply the request's filter criteria to a table.
///
/// Returns a fresh table holding the matching rows in their original
/// order; the input is never touched. Each constraint that cannot apply
/// to this table (column absent, selector set to All) is a no-op rather
/// than an error, so the same criteria work across datasets with
/// different column sets.
pub fn apply_filters(table: &RecordTable, criteria: &FilterCriteria) -> RecordTable {
    let date_col = table.column(DATE_COLUMN);
    let building_col = criteria
        .building_type
        .column_name()
        .and_then(|name| table.column(&name));
    let total_col = table.column(TOTAL_COLUMN);

    let date_active =
        date_col.is_some() && (criteria.start_date.is_some() || criteria.end_date.is_some());
    let min_total_active = total_col.is_some() && criteria.min_total.is_some();

    let mut kept = Vec::with_capacity(table.num_rows());
    for row in 0..table.num_rows() {
        if date_active {
            // An active date filter drops rows whose date is null or
            // unparseable; they cannot be placed inside any range.
            let date = match date_col.and_then(|c| c.date_at(row)) {
                Some(d) => d,
                None => continue,
            };
            if let Some(start) = criteria.start_date {
                if date < start {
                    continue;
                }
            }
            if let Some(end) = criteria.end_date {
                if date > end {
                    continue;
                }
            }
        }

        if let Some(col) = building_col {
            if col.bool_at(row) != Some(true) {
                continue;
            }
        }

        if min_total_active {
            let floor = criteria.min_total.unwrap_or(f64::NEG_INFINITY);
            match total_col.and_then(|c| c.numeric_at(row)) {
                Some(total) if total >= floor => {}
                _ => continue,
            }
        }

        kept.push(row);
    }

    table.select_rows(&kept)
}
