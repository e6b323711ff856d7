use crate::constants::{CATEGORIES_COLUMN, ID_COLUMN, LEFT_SUFFIX, RIGHT_SUFFIX};
use crate::error::Result;
use crate::pipeline::ingestion::csv_source::{read_csv, RawTable};
use crate::pipeline::processing::categories::{category_names, category_values, FieldOrigin};
use crate::pipeline::table::{Column, ColumnType, Table, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Require every row's category names to match the first row's.
    pub validate_category_names: bool,
}

/// Reads both CSV files, inner-joins them on `id` and expands the packed
/// `categories` field into one integer column per category.
#[instrument(skip(options), fields(messages = %messages_path.display(), categories = %categories_path.display()))]
pub fn load_data(messages_path: &Path, categories_path: &Path, options: LoadOptions) -> Result<Table> {
    let messages = read_csv(messages_path)?;
    let categories = read_csv(categories_path)?;
    merge_and_expand(&messages, &categories, options)
}

/// Join + expansion over already-read tables.
pub fn merge_and_expand(messages: &RawTable, categories: &RawTable, options: LoadOptions) -> Result<Table> {
    let m_id = messages.require_column(ID_COLUMN)?;
    let c_id = categories.require_column(ID_COLUMN)?;
    let c_packed = categories.require_column(CATEGORIES_COLUMN)?;

    // Key on the parsed integer when both id columns are integers, so `1`,
    // `01` and ` 1` all meet; otherwise on the cell text
    let integer_keys = ColumnType::infer(messages.column_cells(m_id)) == ColumnType::Integer
        && ColumnType::infer(categories.column_cells(c_id)) == ColumnType::Integer;
    let pairs = inner_join(messages, m_id, categories, c_id, integer_keys);
    info!(
        "Joined {} message rows with {} category rows into {} rows",
        messages.rows.len(),
        categories.rows.len(),
        pairs.len()
    );

    // Category-file columns carried through besides the key and the packed field
    let extra: Vec<usize> = (0..categories.headers.len())
        .filter(|&i| i != c_id && i != c_packed)
        .collect();
    let overlap: HashSet<&str> = extra
        .iter()
        .map(|&i| categories.headers[i].as_str())
        .filter(|name| messages.headers.iter().any(|h| h == name))
        .collect();

    let mut columns = Vec::new();
    let mut message_types = Vec::with_capacity(messages.headers.len());
    for (i, name) in messages.headers.iter().enumerate() {
        let column_type = ColumnType::infer(messages.column_cells(i));
        message_types.push(column_type);
        let name = if overlap.contains(name.as_str()) {
            format!("{}{}", name, LEFT_SUFFIX)
        } else {
            name.clone()
        };
        columns.push(Column::new(name, column_type));
    }
    let mut extra_types = Vec::with_capacity(extra.len());
    for &i in &extra {
        let column_type = ColumnType::infer(categories.column_cells(i));
        extra_types.push(column_type);
        let name = &categories.headers[i];
        let name = if overlap.contains(name.as_str()) {
            format!("{}{}", name, RIGHT_SUFFIX)
        } else {
            name.clone()
        };
        columns.push(Column::new(name, column_type));
    }

    // First merged row decides the category schema; with no merged rows fall
    // back to the first row of the categories file so the columns still exist
    let schema_row = pairs
        .first()
        .map(|&(_, c)| c)
        .or_else(|| (!categories.rows.is_empty()).then_some(0));
    let names = match schema_row {
        Some(row) => {
            let origin = FieldOrigin {
                file: &categories.source,
                id: &categories.rows[row][c_id],
            };
            category_names(&categories.rows[row][c_packed], origin)?
        }
        None => Vec::new(),
    };
    debug!("Derived {} category columns: {:?}", names.len(), names);
    columns.extend(names.iter().map(|n| Column::new(n.clone(), ColumnType::Integer)));

    let mut table = Table::new(columns);
    for (m, c) in pairs {
        let m_row = &messages.rows[m];
        let c_row = &categories.rows[c];
        let origin = FieldOrigin {
            file: &categories.source,
            id: &c_row[c_id],
        };
        let flags = category_values(&c_row[c_packed], &names, options.validate_category_names, origin)?;

        let mut row = Vec::with_capacity(table.columns.len());
        row.extend(m_row.iter().zip(&message_types).map(|(cell, t)| t.convert(cell)));
        row.extend(extra.iter().zip(&extra_types).map(|(&i, t)| t.convert(&c_row[i])));
        row.extend(flags.into_iter().map(Value::Integer));
        table.rows.push(row);
    }

    Ok(table)
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum JoinKey<'a> {
    Integer(i64),
    Text(&'a str),
}

fn join_key(cell: &str, integer: bool) -> Option<JoinKey<'_>> {
    if integer {
        // Empty ids never match
        cell.trim().parse().ok().map(JoinKey::Integer)
    } else {
        Some(JoinKey::Text(cell))
    }
}

/// Row-index pairs of an inner join on `id`. Left order is kept; a key
/// repeated on both sides yields every combination.
fn inner_join(
    left: &RawTable,
    left_key: usize,
    right: &RawTable,
    right_key: usize,
    integer_keys: bool,
) -> Vec<(usize, usize)> {
    let mut index: HashMap<JoinKey<'_>, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        if let Some(key) = join_key(&row[right_key], integer_keys) {
            index.entry(key).or_default().push(i);
        }
    }

    let mut pairs = Vec::new();
    for (i, row) in left.rows.iter().enumerate() {
        let matches = join_key(&row[left_key], integer_keys).and_then(|key| index.get(&key));
        if let Some(matches) = matches {
            pairs.extend(matches.iter().map(|&j| (i, j)));
        }
    }
    pairs
}
