//! # csvgate - schema gate for CSV transaction exports
//!
//! Checks that a CSV file has exactly the expected columns, each with the
//! expected data type, before anything downstream consumes it. Nothing is
//! repaired: a file either passes or the first problem is reported.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV path   │────▶│   Exists?   │────▶│   Parser    │────▶│  Validator  │
//! │  + schema   │     │  (stat)     │     │ (auto-enc)  │     │ (cols/types)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csvgate::{load_and_validate, transactions_schema};
//!
//! fn main() -> Result<(), csvgate::LoadError> {
//!     load_and_validate("var1.csv", &transactions_schema())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy
//! - [`models`] - Parsed table and column type tags
//! - [`schema`] - Expected schema and the built-in transactions schema
//! - [`parser`] - CSV parsing with encoding/delimiter detection and type inference
//! - [`validation`] - Column-set and column-type checks
//! - [`loader`] - Pipeline orchestration and reports
//! - [`logs`] - Console progress log

// Core modules
pub mod error;
pub mod models;
pub mod schema;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Pipeline
pub mod loader;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError, CsvResult, LoadError, LoadResult, SchemaError, SchemaResult, TableError, TableResult,
};

// =============================================================================
// Re-exports - Models & Schema
// =============================================================================

pub use models::{Column, ColumnData, ColumnType, Table};
pub use schema::{transactions_schema, ExpectedColumn, ExpectedSchema};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    csv_to_table,
    decode_content,
    detect_delimiter,
    detect_encoding,
    parse_bytes,
    read_table,
    CsvInfo,
    ParseOptions,
    ParsedCsv,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{validate_structure, SUCCESS_MESSAGE};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use loader::{
    check_file_exists,
    load_and_validate,
    read_csv,
    ReportStatus,
    SchemaValidatedLoader,
    ValidationReport,
};
