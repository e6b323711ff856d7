// Batch pipeline stages: ingestion (read + join), processing (expand + clean)

pub mod ingestion;
pub mod processing;
pub mod table;

pub use ingestion::loader::{load_data, LoadOptions};
pub use processing::cleaner::{clean_data, clean_data_with_report, CleanReport};
pub use table::{Column, ColumnType, Table, Value};
