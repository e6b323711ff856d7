use crate::app::ports::{IfExists, TableSink};
use crate::error::{EtlError, Result};
use crate::pipeline::table::{Column, ColumnType, Table, Value};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Embedded SQLite destination. The connection lives as long as the sink and
/// is closed when it is dropped.
pub struct SqliteSink {
    path: PathBuf,
    conn: Connection,
}

impl SqliteSink {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| EtlError::io(parent, e))?;
        }
        let conn = Connection::open(&path).map_err(|e| EtlError::sqlite(&path, e))?;
        debug!("Opened destination database {}", path.display());
        Ok(Self { path, conn })
    }

    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| self.err(e))?;
        Ok(found.is_some())
    }

    pub fn row_count(&self, name: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", quote_ident(name)), [], |row| row.get(0))
            .map_err(|e| self.err(e))?;
        Ok(count as usize)
    }

    /// Reads a whole table back, columns in declaration order.
    pub fn read_table(&self, name: &str) -> Result<Table> {
        let columns = self.table_columns(name)?;

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {}", quote_ident(name)))
            .map_err(|e| self.err(e))?;
        let width = columns.len();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, SqlValue>(i).map(from_sql_value))
                    .collect::<rusqlite::Result<Vec<Value>>>()
            })
            .map_err(|e| self.err(e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| self.err(e))?;

        Ok(Table { columns, rows })
    }

    fn table_columns(&self, name: &str) -> Result<Vec<Column>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_ident(name)))
            .map_err(|e| self.err(e))?;
        let columns = stmt
            .query_map([], |row| {
                let col_name: String = row.get(1)?;
                let decl: String = row.get(2)?;
                let column_type = if decl.eq_ignore_ascii_case("INTEGER") {
                    ColumnType::Integer
                } else {
                    ColumnType::Text
                };
                Ok(Column::new(col_name, column_type))
            })
            .map_err(|e| self.err(e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| self.err(e))?;
        Ok(columns)
    }

    fn err(&self, source: rusqlite::Error) -> EtlError {
        EtlError::sqlite(&self.path, source)
    }
}

impl TableSink for SqliteSink {
    #[instrument(skip(self, table), fields(db = %self.path.display(), rows = table.len()))]
    fn create_table(&mut self, name: &str, table: &Table, if_exists: IfExists) -> Result<usize> {
        let exists = self.table_exists(name)?;
        let path = self.path.clone();
        let err = |e: rusqlite::Error| EtlError::sqlite(&path, e);

        // Create and fill in one transaction so a failure leaves the table as it was
        let tx = self.conn.transaction().map_err(err)?;
        match (exists, if_exists) {
            (true, IfExists::Fail) => return Err(EtlError::TableExists(name.to_string())),
            (true, IfExists::Replace) => {
                warn!("Replacing existing table {}", name);
                tx.execute(&format!("DROP TABLE {}", quote_ident(name)), [])
                    .map_err(err)?;
                tx.execute(&create_table_sql(name, table), []).map_err(err)?;
            }
            (true, IfExists::Append) => {
                info!("Appending to existing table {}", name);
            }
            (false, _) => {
                tx.execute(&create_table_sql(name, table), []).map_err(err)?;
            }
        }

        {
            let mut stmt = tx.prepare(&insert_sql(name, table)).map_err(err)?;
            for row in &table.rows {
                stmt.execute(params_from_iter(row.iter().map(to_sql_value)))
                    .map_err(err)?;
            }
        }
        tx.commit().map_err(err)?;

        info!("Wrote {} rows to {}", table.len(), name);
        Ok(table.len())
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn create_table_sql(name: &str, table: &Table) -> String {
    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), c.column_type.sql_type()))
        .collect();
    format!("CREATE TABLE {} ({})", quote_ident(name), columns.join(", "))
}

fn insert_sql(name: &str, table: &Table) -> String {
    let columns: Vec<String> = table.columns.iter().map(|c| quote_ident(&c.name)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(name),
        columns.join(", "),
        placeholders.join(", ")
    )
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(v) => SqlValue::Integer(*v),
        Value::Text(s) => SqlValue::Text(s.clone()),
    }
}

fn from_sql_value(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(v) => Value::Integer(v),
        SqlValue::Real(v) => Value::Text(v.to_string()),
        SqlValue::Text(s) => Value::Text(s),
        SqlValue::Blob(b) => Value::Text(String::from_utf8_lossy(&b).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Table {
        let mut table = Table::new(vec![
            Column::new("id", ColumnType::Integer),
            Column::new("message", ColumnType::Text),
            Column::new("related", ColumnType::Integer),
        ]);
        table.rows = vec![
            vec![Value::Integer(1), Value::Text("Help".into()), Value::Integer(1)],
            vec![Value::Integer(2), Value::Null, Value::Integer(0)],
        ];
        table
    }

    #[test]
    fn round_trip_keeps_columns_and_rows() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut sink = SqliteSink::open(dir.path().join("out.db"))?;

        let written = sink.create_table("disaster_data", &sample(), IfExists::Fail)?;
        assert_eq!(written, 2);

        let back = sink.read_table("disaster_data")?;
        assert_eq!(back, sample());
        assert_eq!(sink.row_count("disaster_data")?, 2);
        Ok(())
    }

    #[test]
    fn existing_table_fails_by_default() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut sink = SqliteSink::open(dir.path().join("out.db"))?;
        sink.create_table("disaster_data", &sample(), IfExists::Fail)?;

        let err = sink
            .create_table("disaster_data", &sample(), IfExists::Fail)
            .unwrap_err();
        assert!(matches!(err, EtlError::TableExists(ref n) if n == "disaster_data"));
        assert_eq!(sink.row_count("disaster_data")?, 2);
        Ok(())
    }

    #[test]
    fn replace_and_append_policies() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut sink = SqliteSink::open(dir.path().join("out.db"))?;
        sink.create_table("disaster_data", &sample(), IfExists::Fail)?;

        sink.create_table("disaster_data", &sample(), IfExists::Append)?;
        assert_eq!(sink.row_count("disaster_data")?, 4);

        sink.create_table("disaster_data", &sample(), IfExists::Replace)?;
        assert_eq!(sink.row_count("disaster_data")?, 2);
        Ok(())
    }

    #[test]
    fn failed_append_leaves_table_untouched() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut sink = SqliteSink::open(dir.path().join("out.db"))?;
        sink.create_table("disaster_data", &sample(), IfExists::Fail)?;

        let mut wider = sample();
        wider.columns.push(Column::new("offer", ColumnType::Integer));
        for row in &mut wider.rows {
            row.push(Value::Integer(0));
        }
        let err = sink
            .create_table("disaster_data", &wider, IfExists::Append)
            .unwrap_err();
        assert!(matches!(err, EtlError::Sqlite { .. }));
        assert_eq!(sink.row_count("disaster_data")?, 2);
        Ok(())
    }

    #[test]
    fn unwritable_destination_reports_path() {
        let err = SqliteSink::open("/proc/definitely/not/here.db").err().unwrap();
        assert!(err.to_string().contains("/proc/definitely/not"));
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("disaster_data"), "\"disaster_data\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
