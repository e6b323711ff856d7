use crate::error::Result;
use crate::pipeline::table::Table;
use serde::Deserialize;

/// Policy applied when the destination table already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IfExists {
    /// Abort the run with `TableExists`.
    #[default]
    Fail,
    /// Drop the existing table and recreate it.
    Replace,
    /// Insert into the existing table.
    Append,
}

// Writer-side port: anything that can store a whole table under a name
pub trait TableSink {
    /// Store `table` under `name`, returning the number of rows written.
    fn create_table(&mut self, name: &str, table: &Table, if_exists: IfExists) -> Result<usize>;
}
