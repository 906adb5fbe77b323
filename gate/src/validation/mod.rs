//! Structure and type checks of a parsed [`Table`] against an [`ExpectedSchema`].
//!
//! Two checks, in order:
//!
//! 1. the column *sets* must be equal (order is ignored);
//! 2. each expected column's inferred type must equal the expected type.
//!
//! The first failure ends validation.
//!
//! # Column-set message
//!
//! When columns are both missing and extra, the rendered message names only
//! the extra ones. [`LoadError::SchemaMismatch`] still carries both sets, so
//! callers that need the full diagnosis should match on the fields instead of
//! reading the message.

use std::collections::BTreeSet;

use crate::error::{LoadError, LoadResult};
use crate::logs::log_success;
use crate::models::Table;
use crate::schema::ExpectedSchema;

/// Confirmation emitted when a table passes both checks.
pub const SUCCESS_MESSAGE: &str = "structure and column types match the expected schema";

/// Validate column set, then column types.
pub fn validate_structure(table: &Table, schema: &ExpectedSchema) -> LoadResult<()> {
    check_columns(table, schema)?;
    check_types(table, schema)?;

    log_success(SUCCESS_MESSAGE);
    Ok(())
}

/// Compare column name sets.
pub fn check_columns(table: &Table, schema: &ExpectedSchema) -> LoadResult<()> {
    let actual: BTreeSet<&str> = table.column_names().collect();
    let expected = schema.names();

    if actual == expected {
        return Ok(());
    }

    let missing: BTreeSet<String> = expected.difference(&actual).map(|s| s.to_string()).collect();
    let extra: BTreeSet<String> = actual.difference(&expected).map(|s| s.to_string()).collect();

    let mut message = "table structure does not match the expected schema".to_string();
    if !missing.is_empty() {
        message = format!("missing columns {}", render_set(&missing));
    }
    // Overrides the missing-columns message when both apply
    if !extra.is_empty() {
        message = format!("unexpected extra columns {}", render_set(&extra));
    }

    Err(LoadError::SchemaMismatch { missing, extra, message })
}

/// Compare inferred types in schema order, stopping at the first mismatch.
///
/// Assumes [`check_columns`] passed; a column absent from the table is
/// skipped.
pub fn check_types(table: &Table, schema: &ExpectedSchema) -> LoadResult<()> {
    for expected in schema.columns() {
        let Some(column) = table.column(&expected.name) else {
            continue;
        };
        let actual = column.column_type();
        if actual != expected.column_type {
            return Err(LoadError::TypeMismatch {
                column: expected.name.clone(),
                expected: expected.column_type,
                actual,
            });
        }
    }
    Ok(())
}

fn render_set(names: &BTreeSet<String>) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
    format!("{{{}}}", quoted.join(", "))
}
