//! CSV report reading.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::profile::ColumnMap;

/// Errors that can occur when reading a report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read report file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Report is missing required column {0:?}")]
    MissingColumn(String),

    #[error("Report has no header row")]
    EmptyReport,
}

/// One report row, keyed by header name.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the source file, for diagnostics.
    pub line: u64,
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new(line: u64, fields: HashMap<String, String>) -> Self {
        Self { line, fields }
    }

    /// Field value under the given header, if the row carries one.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// A parsed report: the header row plus every data row, in file order.
#[derive(Debug, Clone)]
pub struct Report {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl Report {
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Ensure the columns a profile needs are present.
    ///
    /// The cost-per-conversion source is satisfied by either the direct
    /// column or a conversions column; everything else is mandatory.
    pub fn check_columns(&self, columns: &ColumnMap) -> Result<(), ReportError> {
        for required in [
            &columns.term,
            &columns.cost,
            &columns.impressions,
            &columns.clicks,
        ] {
            if !self.has_column(required) {
                return Err(ReportError::MissingColumn(required.clone()));
            }
        }

        let has_direct = columns
            .cost_per_conversion
            .as_deref()
            .is_some_and(|c| self.has_column(c));
        let has_computed = columns
            .conversions
            .as_deref()
            .is_some_and(|c| self.has_column(c));
        if !has_direct && !has_computed {
            let wanted = columns
                .cost_per_conversion
                .as_deref()
                .or(columns.conversions.as_deref())
                .unwrap_or("cost per conversion");
            return Err(ReportError::MissingColumn(wanted.to_string()));
        }

        Ok(())
    }
}

/// Parse report text into rows.
///
/// Rows are kept in file order. Blank lines are dropped. Records shorter
/// than the header simply lack the trailing fields; lookups on them
/// return `None` and fail at row granularity downstream.
pub fn read_report(text: &str) -> Result<Report, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ReportError::EmptyReport);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(|value| value.to_string()))
            .collect();
        rows.push(RawRow::new(line, fields));
    }

    Ok(Report { headers, rows })
}

/// Read and parse a report file.
pub fn read_report_file(path: impl AsRef<Path>) -> Result<Report, ReportError> {
    let contents = fs::read_to_string(path)?;
    read_report(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ReportFormat;

    const SAMPLE: &str = "\
Search term,Search term status,Cost,Impressions,Clicks,Conversions,Cost / conv.
free shoes,None,12.00,840,31,0,--
buy sneakers,Added,45.10,2200,120,4,11.28
";

    #[test]
    fn test_rows_keyed_by_header() {
        let report = read_report(SAMPLE).unwrap();
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].get("Search term"), Some("free shoes"));
        assert_eq!(report.rows[1].get("Cost"), Some("45.10"));
        assert_eq!(report.rows[0].get("No such column"), None);
    }

    #[test]
    fn test_line_numbers_follow_the_file() {
        let report = read_report(SAMPLE).unwrap();
        assert_eq!(report.rows[0].line, 2);
        assert_eq!(report.rows[1].line, 3);
    }

    #[test]
    fn test_blank_lines_dropped() {
        let text = "Search term,Cost\n\nfree shoes,12.00\n\n";
        let report = read_report(text).unwrap();
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let text = "Search term,Cost\n\"shoes, red\",\"1,200.00\"\n";
        let report = read_report(text).unwrap();
        assert_eq!(report.rows[0].get("Search term"), Some("shoes, red"));
        assert_eq!(report.rows[0].get("Cost"), Some("1,200.00"));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(read_report(""), Err(ReportError::EmptyReport)));
    }

    #[test]
    fn test_check_columns_accepts_google_layout() {
        let report = read_report(SAMPLE).unwrap();
        let columns = ReportFormat::GoogleAds.default_columns();
        assert!(report.check_columns(&columns).is_ok());
    }

    #[test]
    fn test_check_columns_names_the_missing_one() {
        let report = read_report("Search term,Cost\nx,1.0\n").unwrap();
        let columns = ReportFormat::GoogleAds.default_columns();
        let err = report.check_columns(&columns).unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn(ref c) if c == "Impressions"));
    }

    #[test]
    fn test_short_record_lacks_trailing_fields() {
        let text = "Search term,Cost,Clicks\nbare term,3.00\n";
        let report = read_report(text).unwrap();
        assert_eq!(report.rows[0].get("Clicks"), None);
    }
}
