use chrono::NaiveDate;

use crate::error::{AnalyticsError, Result};

/// Typed column payload with per-cell nulls.
///
/// The processed dashboard files carry a mix of dates, floats, one-hot
/// integer flags, booleans and categorical strings; each maps onto one
/// variant here without losing nullability.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Date(Vec<Option<NaiveDate>>),
    Float(Vec<Option<f64>>),
    Int(Vec<Option<i64>>),
    Bool(Vec<Option<bool>>),
    Str(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Date(v) => v.len(),
            ColumnValues::Float(v) => v.len(),
            ColumnValues::Int(v) => v.len(),
            ColumnValues::Bool(v) => v.len(),
            ColumnValues::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dates(values: Vec<NaiveDate>) -> Self {
        ColumnValues::Date(values.into_iter().map(Some).collect())
    }

    pub fn floats(values: Vec<f64>) -> Self {
        ColumnValues::Float(values.into_iter().map(Some).collect())
    }

    pub fn ints(values: Vec<i64>) -> Self {
        ColumnValues::Int(values.into_iter().map(Some).collect())
    }

    pub fn bools(values: Vec<bool>) -> Self {
        ColumnValues::Bool(values.into_iter().map(Some).collect())
    }

    pub fn strings(values: Vec<&str>) -> Self {
        ColumnValues::Str(values.into_iter().map(|s| Some(s.to_string())).collect())
    }

    /// All-null payload of the same variant, used to pad column-set unions
    fn nulls_like(&self, len: usize) -> Self {
        match self {
            ColumnValues::Date(_) => ColumnValues::Date(vec![None; len]),
            ColumnValues::Float(_) => ColumnValues::Float(vec![None; len]),
            ColumnValues::Int(_) => ColumnValues::Int(vec![None; len]),
            ColumnValues::Bool(_) => ColumnValues::Bool(vec![None; len]),
            ColumnValues::Str(_) => ColumnValues::Str(vec![None; len]),
        }
    }

    fn gather(&self, indices: &[usize]) -> Self {
        match self {
            ColumnValues::Date(v) => {
                ColumnValues::Date(indices.iter().map(|&i| v[i]).collect())
            }
            ColumnValues::Float(v) => {
                ColumnValues::Float(indices.iter().map(|&i| v[i]).collect())
            }
            ColumnValues::Int(v) => ColumnValues::Int(indices.iter().map(|&i| v[i]).collect()),
            ColumnValues::Bool(v) => ColumnValues::Bool(indices.iter().map(|&i| v[i]).collect()),
            ColumnValues::Str(v) => {
                ColumnValues::Str(indices.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }

    fn append(&mut self, other: &Self) -> Result<()> {
        match (self, other) {
            (ColumnValues::Date(a), ColumnValues::Date(b)) => a.extend_from_slice(b),
            (ColumnValues::Float(a), ColumnValues::Float(b)) => a.extend_from_slice(b),
            (ColumnValues::Int(a), ColumnValues::Int(b)) => a.extend_from_slice(b),
            (ColumnValues::Bool(a), ColumnValues::Bool(b)) => a.extend_from_slice(b),
            (ColumnValues::Str(a), ColumnValues::Str(b)) => a.extend_from_slice(b),
            // Upstream files for the same region share a schema; a variant
            // mismatch means the files disagree and the combine must fail.
            _ => {
                return Err(AnalyticsError::InvalidFormat(
                    "column type mismatch while combining tables".to_string(),
                ))
            }
        }
        Ok(())
    }
}

/// A named column of a [`RecordTable`]
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: ColumnValues,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric view of a cell. Integer flags coerce to `f64`; dates,
    /// booleans and strings are not numbers.
    pub fn numeric_at(&self, row: usize) -> Option<f64> {
        match &self.values {
            ColumnValues::Float(v) => v[row],
            ColumnValues::Int(v) => v[row].map(|x| x as f64),
            _ => None,
        }
    }

    /// Truthiness view of a cell, covering native booleans and the 0/1
    /// one-hot encodings the upstream pipeline emits.
    pub fn bool_at(&self, row: usize) -> Option<bool> {
        match &self.values {
            ColumnValues::Bool(v) => v[row],
            ColumnValues::Int(v) => v[row].map(|x| x != 0),
            ColumnValues::Float(v) => v[row].map(|x| x != 0.0),
            _ => None,
        }
    }

    /// Calendar-date view of a cell. String cells are parsed as ISO dates;
    /// unparseable values read as null rather than erroring.
    pub fn date_at(&self, row: usize) -> Option<NaiveDate> {
        match &self.values {
            ColumnValues::Date(v) => v[row],
            ColumnValues::Str(v) => v[row]
                .as_deref()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
            _ => None,
        }
    }

    /// Display form of a cell, for categorical counting and table output
    pub fn display_at(&self, row: usize) -> Option<String> {
        match &self.values {
            ColumnValues::Date(v) => v[row].map(|d| d.to_string()),
            ColumnValues::Float(v) => v[row].map(|x| format!("{:.1}", x)),
            ColumnValues::Int(v) => v[row].map(|x| x.to_string()),
            ColumnValues::Bool(v) => v[row].map(|x| x.to_string()),
            ColumnValues::Str(v) => v[row].clone(),
        }
    }

    /// Sum of all non-null numeric cells
    pub fn sum(&self) -> f64 {
        (0..self.len()).filter_map(|i| self.numeric_at(i)).sum()
    }

    /// Mean of all non-null numeric cells, 0.0 when there are none
    pub fn mean(&self) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for i in 0..self.len() {
            if let Some(x) = self.numeric_at(i) {
                sum += x;
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }
}

/// An immutable columnar table: named columns of equal length, rows in
/// file order. All pipeline stages take a table by reference and return a
/// fresh one; nothing mutates a table after it is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    columns: Vec<Column>,
    num_rows: usize,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column. The first column fixes the row count; later columns
    /// must match it.
    pub fn push_column(&mut self, name: impl Into<String>, values: ColumnValues) -> Result<()> {
        let name = name.into();
        if self.columns.is_empty() {
            self.num_rows = values.len();
        } else if values.len() != self.num_rows {
            return Err(AnalyticsError::ColumnLength {
                column: name,
                expected: self.num_rows,
                actual: values.len(),
            });
        }
        self.columns.push(Column::new(name, values));
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Columns whose name starts with `prefix`, in table order
    pub fn columns_with_prefix(&self, prefix: &str) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.name.starts_with(prefix))
            .collect()
    }

    /// New table keeping only the given rows, in the given order.
    /// Filters pass indices in ascending order, which preserves the
    /// original row order.
    pub fn select_rows(&self, indices: &[usize]) -> RecordTable {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.values.gather(indices)))
            .collect();
        RecordTable {
            columns,
            num_rows: indices.len(),
        }
    }

    /// First `n` rows (fewer if the table is shorter)
    pub fn head(&self, n: usize) -> RecordTable {
        let indices: Vec<usize> = (0..self.num_rows.min(n)).collect();
        self.select_rows(&indices)
    }

    /// Vertical concatenation over the union of column sets. Column order
    /// follows first appearance across the parts; cells missing from a
    /// part become nulls of the column's type.
    pub fn concat(parts: &[&RecordTable]) -> Result<RecordTable> {
        let mut ordered: Vec<(&str, &ColumnValues)> = Vec::new();
        for part in parts {
            for col in &part.columns {
                if !ordered.iter().any(|(name, _)| *name == col.name) {
                    ordered.push((col.name.as_str(), &col.values));
                }
            }
        }

        let mut out = RecordTable::new();
        for (name, template) in ordered {
            let mut values = template.nulls_like(0);
            for part in parts {
                match part.column(name) {
                    Some(col) => values.append(col.values())?,
                    None => values.append(&template.nulls_like(part.num_rows))?,
                }
            }
            out.push_column(name, values)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_push_column_length_check() {
        let mut table = RecordTable::new();
        table
            .push_column("Total", ColumnValues::floats(vec![1.0, 2.0]))
            .unwrap();
        let err = table.push_column("hour", ColumnValues::ints(vec![9]));
        assert!(err.is_err());
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 1);
    }

    #[test]
    fn test_select_rows_preserves_order() {
        let mut table = RecordTable::new();
        table
            .push_column("Total", ColumnValues::floats(vec![10.0, 20.0, 30.0, 40.0]))
            .unwrap();
        let picked = table.select_rows(&[0, 2, 3]);
        assert_eq!(picked.num_rows(), 3);
        let col = picked.column("Total").unwrap();
        assert_eq!(col.numeric_at(0), Some(10.0));
        assert_eq!(col.numeric_at(1), Some(30.0));
        assert_eq!(col.numeric_at(2), Some(40.0));
    }

    #[test]
    fn test_int_flag_truthiness() {
        let col = Column::new("Building Type_Tenant", ColumnValues::ints(vec![0, 1]));
        assert_eq!(col.bool_at(0), Some(false));
        assert_eq!(col.bool_at(1), Some(true));
    }

    #[test]
    fn test_string_dates_parse_as_dates() {
        let col = Column::new(
            "Date",
            ColumnValues::strings(vec!["2013-01-05", "not a date"]),
        );
        assert_eq!(col.date_at(0), Some(date(2013, 1, 5)));
        assert_eq!(col.date_at(1), None);
    }

    #[test]
    fn test_mean_ignores_nulls() {
        let col = Column::new(
            "Total",
            ColumnValues::Float(vec![Some(10.0), None, Some(30.0)]),
        );
        assert_eq!(col.mean(), 20.0);
        assert_eq!(col.sum(), 40.0);
    }

    #[test]
    fn test_empty_column_mean_is_zero() {
        let col = Column::new("Total", ColumnValues::Float(vec![]));
        assert_eq!(col.mean(), 0.0);
    }

    #[test]
    fn test_concat_unions_columns() {
        let mut a = RecordTable::new();
        a.push_column("Total", ColumnValues::floats(vec![1.0, 2.0]))
            .unwrap();
        a.push_column("AC", ColumnValues::floats(vec![0.5, 0.6]))
            .unwrap();

        let mut b = RecordTable::new();
        b.push_column("Total", ColumnValues::floats(vec![3.0]))
            .unwrap();
        b.push_column("Refrigeration", ColumnValues::floats(vec![0.9]))
            .unwrap();

        let combined = RecordTable::concat(&[&a, &b]).unwrap();
        assert_eq!(combined.num_rows(), 3);
        assert_eq!(
            combined.column_names(),
            vec!["Total", "AC", "Refrigeration"]
        );
        let ac = combined.column("AC").unwrap();
        assert_eq!(ac.numeric_at(2), None);
        let refr = combined.column("Refrigeration").unwrap();
        assert_eq!(refr.numeric_at(0), None);
        assert_eq!(refr.numeric_at(2), Some(0.9));
    }

    #[test]
    fn test_concat_rejects_type_mismatch() {
        let mut a = RecordTable::new();
        a.push_column("Total", ColumnValues::floats(vec![1.0]))
            .unwrap();
        let mut b = RecordTable::new();
        b.push_column("Total", ColumnValues::strings(vec!["1.0"]))
            .unwrap();
        assert!(RecordTable::concat(&[&a, &b]).is_err());
    }

    #[test]
    fn test_columns_with_prefix() {
        let mut table = RecordTable::new();
        table
            .push_column("Building Type_Tenant", ColumnValues::ints(vec![1]))
            .unwrap();
        table
            .push_column("Building Type_Single Building", ColumnValues::ints(vec![0]))
            .unwrap();
        table
            .push_column("Total", ColumnValues::floats(vec![5.0]))
            .unwrap();
        let flags = table.columns_with_prefix("Building Type");
        assert_eq!(flags.len(), 2);
    }
}
