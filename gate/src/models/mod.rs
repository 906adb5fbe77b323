//! In-memory table model produced by the parser.
//!
//! - [`ColumnType`] - closed set of inferred column types
//! - [`ColumnData`] - homogeneous values of one column
//! - [`Column`] - a named column
//! - [`Table`] - the parsed file, never empty

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TableError, TableResult};

// =============================================================================
// Column Type
// =============================================================================

/// Logical type of a column, assigned once during parsing.
///
/// Comparison is plain tag equality: an `Int64` column never satisfies a
/// `Float64` expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text (anything that is not uniformly numeric or boolean).
    #[serde(alias = "object", alias = "string")]
    Text,
    /// 64-bit float; also any numeric column with missing cells.
    Float64,
    /// 64-bit signed integer, no missing cells.
    Int64,
    /// `true`/`false` literals, no missing cells.
    Bool,
}

impl ColumnType {
    /// Label used in messages and reports.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Float64 => "float64",
            ColumnType::Int64 => "int64",
            ColumnType::Bool => "bool",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Column Data
// =============================================================================

/// Values of one column. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Text(Vec<Option<String>>),
    Float64(Vec<Option<f64>>),
    Int64(Vec<i64>),
    Bool(Vec<bool>),
}

impl ColumnData {
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::Float64(_) => ColumnType::Float64,
            ColumnData::Int64(_) => ColumnType::Int64,
            ColumnData::Bool(_) => ColumnType::Bool,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Float64(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Int64(_) | ColumnData::Bool(_) => 0,
        }
    }
}

/// A named column of the parsed file.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self { name: name.into(), data }
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }
}

// =============================================================================
// Table
// =============================================================================

/// Parsed CSV content, columns in header order.
///
/// Only [`Table::new`] builds a table, and it refuses zero data rows and
/// ragged columns, so a `Table` in hand has always been parsed and holds at
/// least one complete row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from columns of equal length.
    ///
    /// `row_count` is taken from the first column; any column of another
    /// length is [`TableError::Ragged`].
    pub fn new(columns: Vec<Column>) -> TableResult<Self> {
        let row_count = columns.first().map(|c| c.data.len()).unwrap_or(0);
        if row_count == 0 {
            return Err(TableError::Empty);
        }
        if let Some(column) = columns.iter().find(|c| c.data.len() != row_count) {
            return Err(TableError::Ragged {
                column: column.name.clone(),
                expected: row_count,
                found: column.data.len(),
            });
        }
        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_rejected() {
        let columns = vec![Column::new("a", ColumnData::Text(vec![]))];
        assert_eq!(Table::new(columns), Err(TableError::Empty));
        assert_eq!(Table::new(vec![]), Err(TableError::Empty));
    }

    #[test]
    fn test_ragged_table_rejected() {
        let columns = vec![
            Column::new("id", ColumnData::Int64(vec![1, 2, 3])),
            Column::new("name", ColumnData::Text(vec![Some("a".into())])),
        ];
        assert_eq!(
            Table::new(columns),
            Err(TableError::Ragged {
                column: "name".into(),
                expected: 3,
                found: 1,
            })
        );
    }

    #[test]
    fn test_table_lookup() {
        let table = Table::new(vec![
            Column::new("id", ColumnData::Int64(vec![1, 2])),
            Column::new("amount", ColumnData::Float64(vec![Some(1.5), None])),
        ])
        .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "amount"]);
        let amount = table.column("amount").unwrap();
        assert_eq!(amount.column_type(), ColumnType::Float64);
        assert_eq!(amount.data.missing_count(), 1);
        assert!(table.column("nope").is_none());
    }

    #[test]
    fn test_column_type_serde_aliases() {
        let t: ColumnType = serde_json::from_str("\"object\"").unwrap();
        assert_eq!(t, ColumnType::Text);
        let t: ColumnType = serde_json::from_str("\"float64\"").unwrap();
        assert_eq!(t, ColumnType::Float64);
        assert_eq!(serde_json::to_string(&ColumnType::Int64).unwrap(), "\"int64\"");
    }
}
