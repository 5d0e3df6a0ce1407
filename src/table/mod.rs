//! In-memory tabular dataset backed by delimited text files.
//!
//! Cells are kept as text exactly as they appear in the source file;
//! numeric and date interpretation happens at the point of use. This
//! mirrors the coercion policy of dataframe libraries: a cell that does
//! not parse as a number compares false against any range, and a cell
//! that does not parse as a date becomes the empty null marker instead
//! of erroring.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

use crate::error::TableError;

/// A table of rows with named columns.
///
/// Filters only ever remove rows; no operation adds or removes columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table from headers and rows.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Parses a delimited file with a header row.
    pub fn read_csv(path: &Path) -> Result<Self, TableError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Writes the table as a delimited file: header row first, then data
    /// rows, no index column. Output is deterministic for a given table.
    pub fn write_csv(&self, path: &Path) -> Result<(), TableError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Returns the column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolves a column name to its index.
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Keeps rows whose `column` cell parses as a number inside the
    /// inclusive range `[min, max]`, returning the number of rows dropped.
    ///
    /// Cells that are empty or fail to parse compare false against any
    /// bound and are dropped, as NaN would be. An inverted range
    /// (`min > max`) keeps nothing; it is not an error.
    pub fn retain_numeric_range(
        &mut self,
        column: &str,
        min: f64,
        max: f64,
    ) -> Result<usize, TableError> {
        let idx = self.column_index(column)?;
        let before = self.rows.len();

        self.rows.retain(|row| {
            let cell = row.get(idx).map(|c| c.trim()).unwrap_or("");
            match cell.parse::<f64>() {
                Ok(value) => value >= min && value <= max,
                Err(_) => false,
            }
        });

        Ok(before - self.rows.len())
    }

    /// Rewrites every cell of `column` to a normalized date/time
    /// representation, returning the number of cells that could not be
    /// parsed and were nulled to the empty string.
    ///
    /// Cells that are already empty stay empty and are not counted.
    pub fn coerce_datetime(&mut self, column: &str) -> Result<usize, TableError> {
        let idx = self.column_index(column)?;
        let mut nulled = 0;

        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(idx) {
                let trimmed = cell.trim();
                if trimmed.is_empty() {
                    cell.clear();
                    continue;
                }
                match parse_datetime(trimmed) {
                    Some(normalized) => *cell = normalized,
                    None => {
                        cell.clear();
                        nulled += 1;
                    }
                }
            }
        }

        Ok(nulled)
    }
}

/// Parses a date or datetime string in the formats commonly seen in
/// exported datasets and returns the normalized representation:
/// `%Y-%m-%d` for date-only values, `%Y-%m-%d %H:%M:%S` when a time
/// component is present.
fn parse_datetime(value: &str) -> Option<String> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(format_datetime(dt));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(format_datetime(dt.naive_utc()));
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }

    None
}

/// Formats a datetime, dropping the time component when it is midnight.
fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 {
        dt.date().format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
