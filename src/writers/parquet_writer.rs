use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Datelike;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::Result;
use crate::models::{ColumnValues, RecordTable};
use crate::utils::constants::DEFAULT_ROW_GROUP_SIZE;

/// Days from 0001-01-01 (CE) to the Unix epoch
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Writes a [`RecordTable`] back to parquet, used by the `export` command
/// and for building test fixtures.
pub struct TableWriter {
    compression: Compression,
    row_group_size: usize,
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    pub fn write_table(&self, table: &RecordTable, path: &Path) -> Result<()> {
        let schema = table_schema(table);
        let batch = table_to_batch(table, schema.clone())?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }
}

fn table_schema(table: &RecordTable) -> Arc<Schema> {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|col| {
            let data_type = match col.values() {
                ColumnValues::Date(_) => DataType::Date32,
                ColumnValues::Float(_) => DataType::Float64,
                ColumnValues::Int(_) => DataType::Int64,
                ColumnValues::Bool(_) => DataType::Boolean,
                ColumnValues::Str(_) => DataType::Utf8,
            };
            Field::new(col.name(), data_type, true)
        })
        .collect();
    Arc::new(Schema::new(fields))
}

fn table_to_batch(table: &RecordTable, schema: Arc<Schema>) -> Result<RecordBatch> {
    let arrays: Vec<ArrayRef> = table
        .columns()
        .iter()
        .map(|col| match col.values() {
            ColumnValues::Date(v) => {
                let days: Vec<Option<i32>> = v
                    .iter()
                    .map(|d| d.map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE))
                    .collect();
                Arc::new(Date32Array::from(days)) as ArrayRef
            }
            ColumnValues::Float(v) => Arc::new(Float64Array::from(v.clone())) as ArrayRef,
            ColumnValues::Int(v) => Arc::new(Int64Array::from(v.clone())) as ArrayRef,
            ColumnValues::Bool(v) => Arc::new(BooleanArray::from(v.clone())) as ArrayRef,
            ColumnValues::Str(v) => Arc::new(StringArray::from(v.clone())) as ArrayRef,
        })
        .collect();

    Ok(RecordBatch::try_new(schema, arrays)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::read_table;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("round_trip.parquet");

        let mut table = RecordTable::new();
        table
            .push_column(
                "Date",
                ColumnValues::dates(vec![
                    NaiveDate::from_ymd_opt(2013, 1, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2013, 6, 15).unwrap(),
                ]),
            )
            .unwrap();
        table
            .push_column("Total", ColumnValues::floats(vec![12.5, 30.0]))
            .unwrap();
        table
            .push_column("hour", ColumnValues::ints(vec![9, 14]))
            .unwrap();
        table
            .push_column("is_weekend", ColumnValues::bools(vec![false, true]))
            .unwrap();
        table
            .push_column(
                "load_signature_class",
                ColumnValues::strings(vec!["baseline", "peaked"]),
            )
            .unwrap();

        TableWriter::new().write_table(&table, &path).unwrap();
        let loaded = read_table(&path).unwrap();

        assert_eq!(loaded.num_rows(), 2);
        assert_eq!(
            loaded.column("Date").unwrap().date_at(1),
            NaiveDate::from_ymd_opt(2013, 6, 15)
        );
        assert_eq!(loaded.column("Total").unwrap().numeric_at(0), Some(12.5));
        assert_eq!(loaded.column("hour").unwrap().numeric_at(1), Some(14.0));
        assert_eq!(loaded.column("is_weekend").unwrap().bool_at(1), Some(true));
        assert_eq!(
            loaded
                .column("load_signature_class")
                .unwrap()
                .display_at(0)
                .as_deref(),
            Some("baseline")
        );
    }

    #[test]
    fn test_nulls_survive_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nulls.parquet");

        let mut table = RecordTable::new();
        table
            .push_column("Total", ColumnValues::Float(vec![Some(1.0), None]))
            .unwrap();
        TableWriter::new().write_table(&table, &path).unwrap();

        let loaded = read_table(&path).unwrap();
        let col = loaded.column("Total").unwrap();
        assert_eq!(col.numeric_at(0), Some(1.0));
        assert_eq!(col.numeric_at(1), None);
    }
}
