//! Serializable outcome of a validation request.

use serde::Serialize;
use std::path::Path;

use crate::error::LoadError;
use crate::models::{ColumnType, Table};
use crate::parser::CsvInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// One parsed column as seen by the validator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub missing: usize,
}

/// Structured view of a [`LoadError`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportError {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<ColumnType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<ColumnType>,
}

impl From<&LoadError> for ReportError {
    fn from(err: &LoadError) -> Self {
        let mut report = ReportError {
            kind: err.kind().to_string(),
            message: err.to_string(),
            missing: Vec::new(),
            extra: Vec::new(),
            column: None,
            expected: None,
            actual: None,
        };
        match err {
            LoadError::SchemaMismatch { missing, extra, .. } => {
                report.missing = missing.iter().cloned().collect();
                report.extra = extra.iter().cloned().collect();
            }
            LoadError::TypeMismatch { column, expected, actual } => {
                report.column = Some(column.clone());
                report.expected = Some(*expected);
                report.actual = Some(*actual);
            }
            _ => {}
        }
        report
    }
}

/// Result of one validation request, ready for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub path: String,
    pub status: ReportStatus,
    /// RFC 3339 time the report was produced
    pub checked_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_info: Option<CsvInfo>,
    pub columns: Vec<ColumnSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReportError>,
}

impl ValidationReport {
    pub fn passed(path: &Path, info: CsvInfo, table: &Table) -> Self {
        Self {
            path: path.display().to_string(),
            status: ReportStatus::Passed,
            checked_at: chrono::Utc::now().to_rfc3339(),
            csv_info: Some(info),
            columns: summarize(Some(table)),
            error: None,
        }
    }

    /// Report for a failed request. `info` and `table` are whatever the
    /// pipeline got to before failing.
    pub fn failed(path: &Path, err: &LoadError, info: Option<CsvInfo>, table: Option<&Table>) -> Self {
        Self {
            path: path.display().to_string(),
            status: ReportStatus::Failed,
            checked_at: chrono::Utc::now().to_rfc3339(),
            csv_info: info,
            columns: summarize(table),
            error: Some(ReportError::from(err)),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }
}

fn summarize(table: Option<&Table>) -> Vec<ColumnSummary> {
    table
        .map(|t| {
            t.columns()
                .iter()
                .map(|c| ColumnSummary {
                    name: c.name.clone(),
                    column_type: c.column_type(),
                    missing: c.data.missing_count(),
                })
                .collect()
        })
        .unwrap_or_default()
}
