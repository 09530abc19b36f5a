use std::fs::File;
use std::path::Path;

use arrow::array::*;
use arrow::datatypes::{DataType, TimeUnit};
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::Result;
use crate::models::{ColumnValues, RecordTable};
use crate::utils::constants::DEFAULT_READ_BATCH_SIZE;

/// Days from 0001-01-01 (CE) to the Unix epoch, for Date32 conversion
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const SECONDS_PER_DAY: i64 = 86_400;

fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

fn date_from_epoch_seconds(secs: i64) -> Option<NaiveDate> {
    let days = secs.div_euclid(SECONDS_PER_DAY);
    i32::try_from(days).ok().and_then(date_from_epoch_days)
}

/// Read a parquet file into a [`RecordTable`].
///
/// The dashboard files have no fixed schema, so every column the type map
/// covers is loaded and anything else (nested types, decimals) is skipped.
/// Skipping is deliberate: a consumer that needs a missing column already
/// has to handle its absence.
pub fn read_table(path: &Path) -> Result<RecordTable> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(DEFAULT_READ_BATCH_SIZE)
        .build()?;

    let mut names: Vec<String> = Vec::new();
    let mut columns: Vec<ColumnValues> = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        if names.is_empty() {
            for field in batch.schema().fields() {
                if let Some(values) = empty_values_for(field.data_type()) {
                    names.push(field.name().clone());
                    columns.push(values);
                } else {
                    tracing::debug!(
                        column = field.name().as_str(),
                        data_type = ?field.data_type(),
                        "skipping column with unsupported type"
                    );
                }
            }
        }

        for (name, values) in names.iter().zip(columns.iter_mut()) {
            let idx = batch.schema().index_of(name)?;
            append_array(values, batch.column(idx));
        }
    }

    let mut table = RecordTable::new();
    for (name, values) in names.into_iter().zip(columns) {
        table.push_column(name, values)?;
    }
    Ok(table)
}

fn empty_values_for(data_type: &DataType) -> Option<ColumnValues> {
    match data_type {
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            Some(ColumnValues::Date(Vec::new()))
        }
        DataType::Float32 | DataType::Float64 => Some(ColumnValues::Float(Vec::new())),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => Some(ColumnValues::Int(Vec::new())),
        DataType::Boolean => Some(ColumnValues::Bool(Vec::new())),
        DataType::Utf8 | DataType::LargeUtf8 => Some(ColumnValues::Str(Vec::new())),
        _ => None,
    }
}

fn append_array(values: &mut ColumnValues, array: &ArrayRef) {
    match values {
        ColumnValues::Date(out) => append_dates(out, array),
        ColumnValues::Float(out) => append_floats(out, array),
        ColumnValues::Int(out) => append_ints(out, array),
        ColumnValues::Bool(out) => append_bools(out, array),
        ColumnValues::Str(out) => append_strings(out, array),
    }
}

fn append_dates(out: &mut Vec<Option<NaiveDate>>, array: &ArrayRef) {
    match array.data_type() {
        DataType::Date32 => {
            let arr = array.as_primitive::<arrow::datatypes::Date32Type>();
            for i in 0..arr.len() {
                out.push(if arr.is_null(i) {
                    None
                } else {
                    date_from_epoch_days(arr.value(i))
                });
            }
        }
        DataType::Date64 => {
            let arr = array.as_primitive::<arrow::datatypes::Date64Type>();
            for i in 0..arr.len() {
                out.push(if arr.is_null(i) {
                    None
                } else {
                    date_from_epoch_seconds(arr.value(i) / 1_000)
                });
            }
        }
        DataType::Timestamp(unit, _) => {
            let divisor = match unit {
                TimeUnit::Second => 1,
                TimeUnit::Millisecond => 1_000,
                TimeUnit::Microsecond => 1_000_000,
                TimeUnit::Nanosecond => 1_000_000_000,
            };
            for i in 0..array.len() {
                let value = match unit {
                    TimeUnit::Second => nullable_primitive::<arrow::datatypes::TimestampSecondType>(array, i),
                    TimeUnit::Millisecond => nullable_primitive::<arrow::datatypes::TimestampMillisecondType>(array, i),
                    TimeUnit::Microsecond => nullable_primitive::<arrow::datatypes::TimestampMicrosecondType>(array, i),
                    TimeUnit::Nanosecond => nullable_primitive::<arrow::datatypes::TimestampNanosecondType>(array, i),
                };
                out.push(value.and_then(|v| date_from_epoch_seconds(v / divisor)));
            }
        }
        _ => out.extend(std::iter::repeat(None).take(array.len())),
    }
}

fn nullable_primitive<T>(array: &ArrayRef, i: usize) -> Option<T::Native>
where
    T: arrow::datatypes::ArrowPrimitiveType,
{
    let arr = array.as_primitive::<T>();
    if arr.is_null(i) {
        None
    } else {
        Some(arr.value(i))
    }
}

fn append_floats(out: &mut Vec<Option<f64>>, array: &ArrayRef) {
    match array.data_type() {
        DataType::Float32 => {
            let arr = array.as_primitive::<arrow::datatypes::Float32Type>();
            for i in 0..arr.len() {
                out.push((!arr.is_null(i)).then(|| arr.value(i) as f64));
            }
        }
        DataType::Float64 => {
            let arr = array.as_primitive::<arrow::datatypes::Float64Type>();
            for i in 0..arr.len() {
                out.push((!arr.is_null(i)).then(|| arr.value(i)));
            }
        }
        _ => out.extend(std::iter::repeat(None).take(array.len())),
    }
}

fn append_ints(out: &mut Vec<Option<i64>>, array: &ArrayRef) {
    macro_rules! widen {
        ($ty:ty) => {{
            let arr = array.as_primitive::<$ty>();
            for i in 0..arr.len() {
                out.push((!arr.is_null(i)).then(|| arr.value(i) as i64));
            }
        }};
    }
    match array.data_type() {
        DataType::Int8 => widen!(arrow::datatypes::Int8Type),
        DataType::Int16 => widen!(arrow::datatypes::Int16Type),
        DataType::Int32 => widen!(arrow::datatypes::Int32Type),
        DataType::Int64 => widen!(arrow::datatypes::Int64Type),
        DataType::UInt8 => widen!(arrow::datatypes::UInt8Type),
        DataType::UInt16 => widen!(arrow::datatypes::UInt16Type),
        DataType::UInt32 => widen!(arrow::datatypes::UInt32Type),
        DataType::UInt64 => widen!(arrow::datatypes::UInt64Type),
        _ => out.extend(std::iter::repeat(None).take(array.len())),
    }
}

fn append_bools(out: &mut Vec<Option<bool>>, array: &ArrayRef) {
    match array.as_any().downcast_ref::<BooleanArray>() {
        Some(arr) => {
            for i in 0..arr.len() {
                out.push((!arr.is_null(i)).then(|| arr.value(i)));
            }
        }
        None => out.extend(std::iter::repeat(None).take(array.len())),
    }
}

fn append_strings(out: &mut Vec<Option<String>>, array: &ArrayRef) {
    match array.data_type() {
        DataType::Utf8 => {
            let arr = array.as_string::<i32>();
            for i in 0..arr.len() {
                out.push((!arr.is_null(i)).then(|| arr.value(i).to_string()));
            }
        }
        DataType::LargeUtf8 => {
            let arr = array.as_string::<i64>();
            for i in 0..arr.len() {
                out.push((!arr.is_null(i)).then(|| arr.value(i).to_string()));
            }
        }
        _ => out.extend(std::iter::repeat(None).take(array.len())),
    }
}

/// Parquet file statistics for the `info` command
#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Rows: {} | Row groups: {} | File size: {:.1} KB",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0
        )
    }
}

/// Read parquet metadata without materializing any rows
pub fn file_info(path: &Path) -> Result<ParquetFileInfo> {
    use parquet::file::reader::{FileReader, SerializedFileReader};

    let file = File::open(path)?;
    let reader = SerializedFileReader::new(file)?;
    let metadata = reader.metadata();

    let total_rows = metadata.file_metadata().num_rows();
    let row_groups = metadata.num_row_groups();
    let row_group_sizes = (0..row_groups)
        .map(|i| metadata.row_group(i).num_rows())
        .collect();
    let file_size = std::fs::metadata(path)?.len();

    Ok(ParquetFileInfo {
        total_rows,
        row_groups: row_groups as i32,
        row_group_sizes,
        file_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_day_conversion() {
        assert_eq!(
            date_from_epoch_days(0),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
        assert_eq!(
            date_from_epoch_days(15_706),
            NaiveDate::from_ymd_opt(2013, 1, 1)
        );
    }

    #[test]
    fn test_epoch_seconds_conversion_rounds_down() {
        // Mid-day timestamps land on the containing calendar date
        let noon = 15_706 * SECONDS_PER_DAY + 12 * 3600;
        assert_eq!(
            date_from_epoch_seconds(noon),
            NaiveDate::from_ymd_opt(2013, 1, 1)
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_table(Path::new("does/not/exist.parquet")).is_err());
        assert!(file_info(Path::new("does/not/exist.parquet")).is_err());
    }
}
