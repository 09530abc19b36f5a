pub mod dataset_store;
pub mod parquet_reader;

pub use dataset_store::DatasetStore;
pub use parquet_reader::{file_info, read_table, ParquetFileInfo};
