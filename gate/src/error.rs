//! Error types for the csvgate validation pipeline.
//!
//! - [`CsvError`] - reading, decoding and parsing the input file
//! - [`SchemaError`] - building or loading an [`crate::ExpectedSchema`]
//! - [`LoadError`] - top-level pipeline failures, one variant per stage outcome
//!
//! Every stage fails fast: nothing here is recovered locally, the first error
//! travels unmodified up to the caller.

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::ColumnType;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while turning the file into a [`crate::Table`].
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    /// Syntax error reported by the CSV reader.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Bytes are not valid in the detected or requested encoding.
    #[error("cannot decode content as {0}")]
    Encoding(String),

    /// Delimiter must fit in one byte.
    #[error("delimiter must be a single ASCII character, got {0:?}")]
    Delimiter(char),

    /// Nothing to use as a header row.
    #[error("no columns to parse from file")]
    NoHeaders,

    /// Parsed columns do not form a table.
    #[error("{0}")]
    Table(#[from] TableError),

    /// A data row carries more fields than the header declares.
    #[error("line {line}: expected {expected} fields, saw {found}")]
    Malformed {
        line: u64,
        expected: usize,
        found: usize,
    },
}

// =============================================================================
// Table Errors
// =============================================================================

/// Errors from [`crate::Table::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// No data rows.
    #[error("table has no data rows")]
    Empty,

    /// Columns of different lengths.
    #[error("column '{column}' holds {found} values, expected {expected}")]
    Ragged {
        column: String,
        expected: usize,
        found: usize,
    },
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Errors while building or reading an expected schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema declares no columns")]
    Empty,

    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(String),

    #[error("cannot read schema file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid schema file: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Failure of a validation request.
///
/// Returned by [`crate::SchemaValidatedLoader::load_and_validate`]. The
/// variants follow the pipeline order: existence, parse, structure, types.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Input file is absent (or is not a regular file).
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be parsed.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: CsvError,
    },

    /// Header parsed, but no data rows follow it.
    #[error("file {} contains no data rows", path.display())]
    EmptyData { path: PathBuf },

    /// Column set differs from the expected one.
    ///
    /// `message` reports only the extra columns when both sets are non-empty;
    /// read `missing` and `extra` for the full picture.
    #[error("{message}")]
    SchemaMismatch {
        missing: BTreeSet<String>,
        extra: BTreeSet<String>,
        message: String,
    },

    /// First column whose inferred type differs from the expected one.
    #[error("wrong data type in column '{column}': expected {expected}, found {actual}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        actual: ColumnType,
    },
}

impl LoadError {
    /// Short machine-friendly name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::NotFound { .. } => "not_found",
            LoadError::ReadFailure { .. } => "read_failure",
            LoadError::EmptyData { .. } => "empty_data",
            LoadError::SchemaMismatch { .. } => "schema_mismatch",
            LoadError::TypeMismatch { .. } => "type_mismatch",
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for table construction.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for schema construction.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for pipeline operations.
pub type LoadResult<T> = Result<T, LoadError>;
