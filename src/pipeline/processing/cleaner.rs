use crate::constants::ORIGINAL_COLUMN;
use crate::error::{EtlError, Result};
use crate::pipeline::table::{Row, Table};
use std::collections::HashSet;
use tracing::{info, instrument};

/// What the cleaner removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub rows_in: usize,
    pub duplicates_removed: usize,
}

/// Drops exact-duplicate rows, then the `original` column.
pub fn clean_data(table: Table) -> Result<Table> {
    clean_data_with_report(table).map(|(table, _)| table)
}

#[instrument(skip(table), fields(rows = table.len()))]
pub fn clean_data_with_report(mut table: Table) -> Result<(Table, CleanReport)> {
    let rows_in = table.len();
    table.rows = dedup_rows(std::mem::take(&mut table.rows));
    let duplicates_removed = rows_in - table.len();
    info!("Removed {} duplicate rows", duplicates_removed);

    if !table.drop_column(ORIGINAL_COLUMN) {
        return Err(EtlError::missing_column("merged table", ORIGINAL_COLUMN));
    }

    Ok((
        table,
        CleanReport {
            rows_in,
            duplicates_removed,
        },
    ))
}

/// Keeps the first occurrence of every distinct row, in input order.
fn dedup_rows(rows: Vec<Row>) -> Vec<Row> {
    let mut seen: HashSet<Row> = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect()
}
