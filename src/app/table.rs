//! Tabular parsing for upstream CSV feeds
//!
//! Converts raw delimited text with a header line into a fully materialized
//! [`Table`] of [`RawRow`]s. Header names are kept verbatim and every data
//! line must carry exactly as many fields as the header declares.

use std::sync::Arc;

use tracing::debug;

use crate::errors::{TableError, TableResult};

/// One data line of a feed, addressable by column name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    columns: Arc<[String]>,
    values: Vec<String>,
    line: u64,
}

impl RawRow {
    /// Value of a column, or `None` when the feed has no such column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.values.get(index))
            .map(String::as_str)
    }

    /// 1-based line number of this row in the source text
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Column name and value pairs, in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

/// An ordered, immutable sequence of rows sharing one header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Arc<[String]>,
    rows: Vec<RawRow>,
}

impl Table {
    /// Parse delimited text whose first line names the columns
    ///
    /// # Errors
    ///
    /// Returns `TableError::MissingHeader` for empty text and
    /// `TableError::FieldCountMismatch` when a line's field count differs
    /// from the header's.
    pub fn parse(text: &str) -> TableResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(text.as_bytes());

        let header = reader.headers()?.clone();
        if header.is_empty() {
            return Err(TableError::MissingHeader);
        }
        let columns: Arc<[String]> = header.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(Self::classify_error)?;
            let line = record.position().map(|pos| pos.line()).unwrap_or(0);
            rows.push(RawRow {
                columns: Arc::clone(&columns),
                values: record.iter().map(str::to_string).collect(),
                line,
            });
        }

        debug!(
            "Parsed table with {} columns and {} rows",
            columns.len(),
            rows.len()
        );

        Ok(Self { columns, rows })
    }

    fn classify_error(error: csv::Error) -> TableError {
        match error.kind() {
            csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => TableError::FieldCountMismatch {
                line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
                expected: *expected_len as usize,
                found: *len as usize,
            },
            _ => TableError::Malformed(error),
        }
    }

    /// Header names, verbatim
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in file order
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in file order
    pub fn iter(&self) -> std::slice::Iter<'_, RawRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a RawRow;
    type IntoIter = std::slice::Iter<'a, RawRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
