//! The validation pipeline: existence check, parse, structure/type check.
//!
//! # Example
//!
//! ```rust,ignore
//! use csvgate::{transactions_schema, SchemaValidatedLoader};
//!
//! let mut loader = SchemaValidatedLoader::new("var1.csv", transactions_schema());
//! let report = loader.load_and_validate()?;
//! println!("{} rows checked", report.csv_info.unwrap().row_count);
//! ```

use std::path::{Path, PathBuf};

use crate::error::{CsvError, LoadError, LoadResult, TableError};
use crate::logs::{log_info, log_info_indent, log_warning};
use crate::models::Table;
use crate::parser::{read_table, CsvInfo, ParseOptions, ParsedCsv};
use crate::schema::ExpectedSchema;
use crate::validation::validate_structure;

pub mod report;

pub use report::{ColumnSummary, ReportError, ReportStatus, ValidationReport};

/// Fail with [`LoadError::NotFound`] unless `path` names a regular file.
pub fn check_file_exists<P: AsRef<Path>>(path: P) -> LoadResult<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() || !path.is_file() {
        return Err(LoadError::NotFound { path: path.to_path_buf() });
    }
    Ok(())
}

/// Parse the file into a non-empty [`Table`].
pub fn read_csv<P: AsRef<Path>>(path: P, options: &ParseOptions) -> LoadResult<(CsvInfo, Table)> {
    let path = path.as_ref();
    let parsed = parse_file(path, options)?;
    let info = parsed.info.clone();
    let table = build_table(path, parsed)?;
    Ok((info, table))
}

fn parse_file(path: &Path, options: &ParseOptions) -> LoadResult<ParsedCsv> {
    read_table(path, options).map_err(|source| LoadError::ReadFailure {
        path: path.to_path_buf(),
        source,
    })
}

fn build_table(path: &Path, parsed: ParsedCsv) -> LoadResult<Table> {
    parsed.into_table().map_err(|err| match err {
        TableError::Empty => LoadError::EmptyData { path: path.to_path_buf() },
        other => LoadError::ReadFailure {
            path: path.to_path_buf(),
            source: CsvError::Table(other),
        },
    })
}

/// Run the whole pipeline once with default parse options.
pub fn load_and_validate<P: AsRef<Path>>(path: P, schema: &ExpectedSchema) -> LoadResult<ValidationReport> {
    SchemaValidatedLoader::new(path.as_ref(), schema.clone()).load_and_validate()
}

/// One validation request: a file, the schema it must satisfy, and how to
/// read it.
///
/// Owns the parsed table of its latest run.
#[derive(Debug)]
pub struct SchemaValidatedLoader {
    path: PathBuf,
    schema: ExpectedSchema,
    options: ParseOptions,
    info: Option<CsvInfo>,
    table: Option<Table>,
}

impl SchemaValidatedLoader {
    pub fn new(path: impl Into<PathBuf>, schema: ExpectedSchema) -> Self {
        Self {
            path: path.into(),
            schema,
            options: ParseOptions::default(),
            info: None,
            table: None,
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &ExpectedSchema {
        &self.schema
    }

    /// Table parsed by the latest run, if parsing got that far.
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn csv_info(&self) -> Option<&CsvInfo> {
        self.info.as_ref()
    }

    /// Existence check, parse, then structure/type validation.
    ///
    /// Stops at the first failing stage and returns its error untouched.
    pub fn load_and_validate(&mut self) -> LoadResult<ValidationReport> {
        self.info = None;
        self.table = None;

        log_info(format!("Checking {}", self.path.display()));
        check_file_exists(&self.path)?;

        let parsed = parse_file(&self.path, &self.options)?;
        let info = parsed.info.clone();
        self.info = Some(info.clone());
        log_info_indent(format!("Encoding: {}", info.encoding), 1);
        if info.encoding != "utf-8" {
            log_warning(format!("{} is not UTF-8, decoded as {}", self.path.display(), info.encoding));
        }
        log_info_indent(format!("Delimiter: '{}'", format_delimiter(info.delimiter)), 1);
        log_info_indent(format!("Rows: {}", info.row_count), 1);
        log_info_indent(format!("Columns: {}", info.headers.join(", ")), 1);

        let table = build_table(&self.path, parsed)?;

        let outcome = validate_structure(&table, &self.schema);
        let table = self.table.insert(table);
        outcome?;

        Ok(ValidationReport::passed(&self.path, info, table))
    }

    /// Report for an error returned by [`Self::load_and_validate`].
    pub fn failure_report(&self, err: &LoadError) -> ValidationReport {
        ValidationReport::failed(&self.path, err, self.info.clone(), self.table.as_ref())
    }
}

pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
