//! Expected schema: which columns a file must have and their types.
//!
//! Schemas are immutable values handed to the loader; nothing here is global.
//! They come from code ([`ExpectedSchema::new`], [`transactions_schema`]) or
//! from a JSON file:
//!
//! ```json
//! { "columns": [ { "name": "amount", "type": "float64" } ] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{SchemaError, SchemaResult};
use crate::models::ColumnType;

/// One expected column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    columns: Vec<ExpectedColumn>,
}

/// Ordered mapping of column name to expected type.
///
/// Order only drives the type-check iteration; column-set comparison is
/// unordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedSchema {
    columns: Vec<ExpectedColumn>,
}

impl ExpectedSchema {
    /// Build a schema from `(name, type)` pairs.
    pub fn new<I, S>(columns: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<String>,
    {
        let columns = columns
            .into_iter()
            .map(|(name, column_type)| ExpectedColumn { name: name.into(), column_type })
            .collect();
        Self::from_columns(columns)
    }

    fn from_columns(columns: Vec<ExpectedColumn>) -> SchemaResult<Self> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self { columns })
    }

    /// Parse a JSON schema document.
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let file: SchemaFile = serde_json::from_str(json)?;
        Self::from_columns(file.columns)
    }

    /// Read a JSON schema file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SchemaResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn columns(&self) -> &[ExpectedColumn] {
        &self.columns
    }

    pub fn names(&self) -> BTreeSet<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.column_type)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// =============================================================================
// Built-in schema
// =============================================================================

/// Header names of the transaction export, in file order.
pub const TRANSACTION_COLUMNS: [(&str, ColumnType); 11] = [
    ("Участники гражданского оборота", ColumnType::Text),
    ("Тип операции", ColumnType::Text),
    ("Сумма операции", ColumnType::Float64),
    ("Результат операции", ColumnType::Text),
    ("Место оплаты", ColumnType::Text),
    ("Терминал оплаты", ColumnType::Text),
    ("Дата оплаты", ColumnType::Text),
    ("Время оплаты", ColumnType::Text),
    ("Cash-back", ColumnType::Text),
    ("Сумма cash-back", ColumnType::Float64),
    ("Вид расчета", ColumnType::Text),
];

/// Schema of the transaction export this gate is deployed for.
pub fn transactions_schema() -> ExpectedSchema {
    ExpectedSchema {
        columns: TRANSACTION_COLUMNS
            .iter()
            .map(|&(name, column_type)| ExpectedColumn { name: name.to_string(), column_type })
            .collect(),
    }
}
