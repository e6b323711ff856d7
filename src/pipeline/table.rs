use std::fmt;

/// A single cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
        }
    }

    /// Narrowest type that holds every non-empty cell: `Integer` when all of
    /// them parse as `i64`, `Text` otherwise.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a str>) -> Self {
        let all_integers = cells
            .into_iter()
            .filter(|c| !c.is_empty())
            .all(|c| c.trim().parse::<i64>().is_ok());
        if all_integers {
            ColumnType::Integer
        } else {
            ColumnType::Text
        }
    }

    /// Converts a raw CSV cell into a value of this type. Empty cells are `Null`.
    pub fn convert(&self, cell: &str) -> Value {
        if cell.is_empty() {
            return Value::Null;
        }
        match self {
            ColumnType::Integer => match cell.trim().parse::<i64>() {
                Ok(v) => Value::Integer(v),
                Err(_) => Value::Text(cell.to_string()),
            },
            ColumnType::Text => Value::Text(cell.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

pub type Row = Vec<Value>;

/// Row-oriented in-memory table with one declared type per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cell at (`row`, column `name`), if both exist.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Removes column `name` from the schema and every row. Returns `false`
    /// when there is no such column.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_integer_only_when_every_cell_parses() {
        assert_eq!(ColumnType::infer(["1", "", "42"]), ColumnType::Integer);
        assert_eq!(ColumnType::infer(["1", "x"]), ColumnType::Text);
        assert_eq!(ColumnType::infer(["1.5"]), ColumnType::Text);
    }

    #[test]
    fn empty_cells_become_null() {
        assert_eq!(ColumnType::Text.convert(""), Value::Null);
        assert_eq!(ColumnType::Integer.convert(""), Value::Null);
        assert_eq!(ColumnType::Integer.convert("7"), Value::Integer(7));
        assert_eq!(ColumnType::Text.convert("Help"), Value::Text("Help".into()));
    }

    #[test]
    fn drop_column_removes_cells() {
        let mut table = Table::new(vec![
            Column::new("id", ColumnType::Integer),
            Column::new("original", ColumnType::Text),
            Column::new("message", ColumnType::Text),
        ]);
        table.rows.push(vec![
            Value::Integer(1),
            Value::Null,
            Value::Text("Help".into()),
        ]);

        assert!(table.drop_column("original"));
        assert_eq!(table.column_names(), vec!["id", "message"]);
        assert_eq!(table.rows[0], vec![Value::Integer(1), Value::Text("Help".into())]);
        assert!(!table.drop_column("original"));
    }
}
