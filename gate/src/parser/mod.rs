//! CSV reader with encoding and delimiter auto-detection.
//!
//! Turns a delimited text file into a [`Table`], tagging each column with an
//! inferred [`ColumnType`]. No schema knowledge here.

use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult, TableResult};
use crate::models::{Column, ColumnData, ColumnType, Table};

/// Cell contents treated as missing values.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_TOKENS: &[&str] = &["True", "TRUE", "true"];
const FALSE_TOKENS: &[&str] = &["False", "FALSE", "false"];

/// How to read the file. `None` means auto-detect.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub delimiter: Option<char>,
    pub encoding: Option<String>,
}

/// Metadata about a parsed file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Parser output: metadata plus typed columns.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub info: CsvInfo,
    columns: Vec<Column>,
}

impl ParsedCsv {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Fails with [`crate::TableError::Empty`] when the file had a header but no
    /// data rows.
    pub fn into_table(self) -> TableResult<Table> {
        Table::new(self.columns)
    }
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 wins outright; otherwise chardet decides.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }
    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "windows-1251" | "cp1251" => "windows-1251".to_string(),
        "koi8-r" => "koi8-r".to_string(),
        "maccyrillic" | "x-mac-cyrillic" => "x-mac-cyrillic".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes using an encoding label. A leading BOM is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let codec = encoding_rs::Encoding::for_label(encoding.trim().as_bytes())
        .ok_or_else(|| CsvError::Encoding(encoding.to_string()))?;
    let (text, _, had_errors) = codec.decode(bytes);
    if had_errors {
        return Err(CsvError::Encoding(encoding.to_string()));
    }
    Ok(text.into_owned())
}

/// Detect the delimiter by counting occurrences in the first non-blank line.
///
/// Falls back to `,` when no candidate appears.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Read and parse a CSV file.
///
/// The file handle lives only inside this call.
pub fn read_table<P: AsRef<Path>>(path: P, options: &ParseOptions) -> CsvResult<ParsedCsv> {
    let mut bytes = Vec::new();
    {
        let mut file = File::open(path.as_ref())?;
        file.read_to_end(&mut bytes)?;
    }
    parse_bytes(&bytes, options)
}

/// Parse CSV bytes, detecting whatever `options` leaves unset.
pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> CsvResult<ParsedCsv> {
    let encoding = match &options.encoding {
        Some(label) => label.clone(),
        None => detect_encoding(bytes),
    };
    let content = decode_content(bytes, &encoding)?;
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| detect_delimiter(&content));

    parse_str(&content, delimiter, encoding)
}

/// Parse already-decoded CSV text with an explicit delimiter.
///
/// # Example
/// ```ignore
/// let parsed = csv_to_table("name,amount\nAlice,1.5", ',')?;
/// assert_eq!(parsed.info.row_count, 1);
/// ```
pub fn csv_to_table(content: &str, delimiter: char) -> CsvResult<ParsedCsv> {
    parse_str(content, delimiter, "utf-8".to_string())
}

fn parse_str(content: &str, delimiter: char, encoding: String) -> CsvResult<ParsedCsv> {
    if !delimiter.is_ascii() {
        return Err(CsvError::Delimiter(delimiter));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut records = reader.records();

    let header = records.next().ok_or(CsvError::NoHeaders)??;
    let headers = dedupe_headers(header.iter());

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let mut row_count = 0;

    for result in records {
        let record = result?;
        if record.len() > headers.len() {
            return Err(CsvError::Malformed {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: headers.len(),
                found: record.len(),
            });
        }
        for (i, column) in cells.iter_mut().enumerate() {
            // Short rows are padded with missing cells
            let value = record.get(i).filter(|v| !MISSING_TOKENS.contains(v));
            column.push(value.map(str::to_string));
        }
        row_count += 1;
    }

    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name.clone(), infer_column(values)))
        .collect();

    Ok(ParsedCsv {
        info: CsvInfo {
            encoding,
            delimiter,
            headers,
            row_count,
        },
        columns,
    })
}

/// Rename repeated header names to `name.1`, `name.2`, ...
fn dedupe_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let raw: Vec<&str> = raw.collect();
    let mut taken: HashSet<String> = raw.iter().map(|s| s.to_string()).collect();
    let mut seen = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());

    for name in raw {
        if seen.insert(name) {
            headers.push(name.to_string());
            continue;
        }
        let mut n = 1;
        let mut candidate = format!("{}.{}", name, n);
        while taken.contains(&candidate) {
            n += 1;
            candidate = format!("{}.{}", name, n);
        }
        taken.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}

/// Assign a [`ColumnType`] to a column and convert its cells.
///
/// Integers need every cell present; one missing cell turns an integer
/// column into `Float64`. A column with no values at all is `Float64`.
pub fn infer_column(cells: Vec<Option<String>>) -> ColumnData {
    let has_missing = cells.iter().any(Option::is_none);

    if cells.iter().all(Option::is_none) {
        return ColumnData::Float64(vec![None; cells.len()]);
    }

    if !has_missing {
        let ints: Option<Vec<i64>> = cells
            .iter()
            .map(|c| c.as_deref().and_then(parse_int))
            .collect();
        if let Some(ints) = ints {
            return ColumnData::Int64(ints);
        }
    }

    let floats: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|c| match c {
            None => Some(None),
            Some(s) => parse_float(s).map(Some),
        })
        .collect();
    if let Some(floats) = floats {
        return ColumnData::Float64(floats);
    }

    if !has_missing {
        let bools: Option<Vec<bool>> = cells
            .iter()
            .map(|c| c.as_deref().and_then(parse_bool))
            .collect();
        if let Some(bools) = bools {
            return ColumnData::Bool(bools);
        }
    }

    ColumnData::Text(cells)
}

/// Inferred type of a column of raw cells, without keeping the values.
pub fn infer_type(cells: &[Option<&str>]) -> ColumnType {
    infer_column(cells.iter().map(|c| c.map(str::to_string)).collect()).column_type()
}

fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse().ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    if TRUE_TOKENS.contains(&s) {
        Some(true)
    } else if FALSE_TOKENS.contains(&s) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;

    const FIXTURE: &str = include_str!("../../fixtures/transactions.csv");

    fn types(parsed: &ParsedCsv) -> Vec<ColumnType> {
        parsed.columns().iter().map(Column::column_type).collect()
    }

    #[test]
    fn test_simple_csv() {
        let parsed = csv_to_table("name,age,score\nAlice,30,1.5\nBob,25,2", ',').unwrap();

        assert_eq!(parsed.info.headers, vec!["name", "age", "score"]);
        assert_eq!(parsed.info.row_count, 2);
        assert_eq!(
            types(&parsed),
            vec![ColumnType::Text, ColumnType::Int64, ColumnType::Float64]
        );
        assert_eq!(
            parsed.columns()[0].data,
            ColumnData::Text(vec![Some("Alice".into()), Some("Bob".into())])
        );
    }

    #[test]
    fn test_quoted_values() {
        let csv = "name;value\n\"Smith; John\";\"1.25\"";
        let parsed = csv_to_table(csv, ';').unwrap();

        assert_eq!(
            parsed.columns()[0].data,
            ColumnData::Text(vec![Some("Smith; John".into())])
        );
        assert_eq!(parsed.columns()[1].data, ColumnData::Float64(vec![Some(1.25)]));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let parsed = csv_to_table("a,b\n1,2\n\n3,4\n", ',').unwrap();
        assert_eq!(parsed.info.row_count, 2);
    }

    #[test]
    fn test_missing_values_make_ints_float() {
        let parsed = csv_to_table("a,b,c\n1,,x\n2,NA,\n", ',').unwrap();

        assert_eq!(parsed.columns()[0].data, ColumnData::Int64(vec![1, 2]));
        // all-missing column
        assert_eq!(parsed.columns()[1].data, ColumnData::Float64(vec![None, None]));
        assert_eq!(
            parsed.columns()[2].data,
            ColumnData::Text(vec![Some("x".into()), None])
        );
    }

    #[test]
    fn test_int_with_missing_is_float() {
        let parsed = csv_to_table("a\n1\n\"\"\n3", ',').unwrap();
        assert_eq!(
            parsed.columns()[0].data,
            ColumnData::Float64(vec![Some(1.0), None, Some(3.0)])
        );
    }

    #[test]
    fn test_short_rows_padded() {
        let parsed = csv_to_table("a,b,c\n1,2\n4,5,6", ',').unwrap();
        assert_eq!(
            parsed.columns()[2].data,
            ColumnData::Float64(vec![None, Some(6.0)])
        );
    }

    #[test]
    fn test_long_row_rejected() {
        let result = csv_to_table("a,b\n1,2\n1,2,3,4", ',');
        match result {
            Err(CsvError::Malformed { line, expected, found }) => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 4);
            }
            other => panic!("expected malformed row, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(csv_to_table("", ','), Err(CsvError::NoHeaders)));
        assert!(matches!(csv_to_table("\n\n", ','), Err(CsvError::NoHeaders)));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let parsed = csv_to_table("a,b\n", ',').unwrap();
        assert_eq!(parsed.info.row_count, 0);
        assert_eq!(parsed.into_table(), Err(TableError::Empty));
    }

    #[test]
    fn test_duplicate_headers_renamed() {
        let parsed = csv_to_table("a,a,a.1,a\n1,2,3,4", ',').unwrap();
        assert_eq!(parsed.info.headers, vec!["a", "a.2", "a.1", "a.3"]);
    }

    #[test]
    fn test_infer_bool_and_text() {
        assert_eq!(infer_type(&[Some("True"), Some("false")]), ColumnType::Bool);
        assert_eq!(infer_type(&[Some("True"), None]), ColumnType::Text);
        assert_eq!(infer_type(&[Some("yes"), Some("no")]), ColumnType::Text);
    }

    #[test]
    fn test_infer_numbers() {
        assert_eq!(infer_type(&[Some(" 42 "), Some("-7")]), ColumnType::Int64);
        assert_eq!(infer_type(&[Some("1e3"), Some("7")]), ColumnType::Float64);
        // comma decimal separator is not a number
        assert_eq!(infer_type(&[Some("1,5")]), ColumnType::Text);
        assert_eq!(infer_type(&[Some("100.0"), Some("abc")]), ColumnType::Text);
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        assert!(matches!(csv_to_table("a§b", '§'), Err(CsvError::Delimiter('§'))));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single\n1"), ',');
        assert_eq!(detect_delimiter("\n\na;b\n"), ';');
    }

    #[test]
    fn test_auto_parse() {
        let csv = "name;age\nAlice;30\nBob;25";
        let parsed = parse_bytes(csv.as_bytes(), &ParseOptions::default()).unwrap();

        assert_eq!(parsed.info.delimiter, ';');
        assert_eq!(parsed.info.encoding, "utf-8");
        assert_eq!(parsed.info.row_count, 2);
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("id,name\n1,x".as_bytes());
        let parsed = parse_bytes(&bytes, &ParseOptions::default()).unwrap();
        assert_eq!(parsed.info.headers[0], "id");
    }

    #[test]
    fn test_windows_1251_decoding() {
        // "Сумма" in windows-1251
        let bytes: &[u8] = &[0xD1, 0xF3, 0xEC, 0xEC, 0xE0];
        let decoded = decode_content(bytes, "windows-1251").unwrap();
        assert_eq!(decoded, "Сумма");
    }

    #[test]
    fn test_windows_1251_detected() {
        let (bytes, _, had_errors) = encoding_rs::WINDOWS_1251.encode(FIXTURE);
        assert!(!had_errors);

        let parsed = parse_bytes(&bytes, &ParseOptions::default()).unwrap();
        assert_eq!(parsed.info.encoding, "windows-1251");
        assert_eq!(parsed.info.delimiter, ',');
        assert_eq!(parsed.info.headers[0], "Участники гражданского оборота");
        assert_eq!(parsed.info.headers[10], "Вид расчета");
        assert_eq!(
            parsed.columns()[1].data,
            ColumnData::Text(vec![
                Some("Покупка".into()),
                Some("Возврат".into()),
                Some("Покупка".into()),
            ])
        );
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let bytes: &[u8] = &[b'a', 0xFF, b'\n'];
        let options = ParseOptions {
            delimiter: None,
            encoding: Some("utf-8".into()),
        };
        assert!(matches!(parse_bytes(bytes, &options), Err(CsvError::Encoding(_))));
    }

    #[test]
    fn test_unknown_encoding_label() {
        assert!(matches!(
            decode_content(b"a", "no-such-charset"),
            Err(CsvError::Encoding(_))
        ));
    }

    #[test]
    fn test_read_table_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_table(dir.path().join("absent.csv"), &ParseOptions::default());
        assert!(matches!(result, Err(CsvError::Io(_))));
    }
}
