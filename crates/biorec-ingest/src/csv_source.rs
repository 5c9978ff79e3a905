#![deny(unsafe_code)]

use std::path::Path;

use crate::RowSource;

/// A rejected row retained for export, with the message explaining the
/// rejection.
#[derive(Debug, Clone)]
pub struct ErrorRow {
    pub values: Vec<String>,
    pub message: String,
}

/// A [`RowSource`] staged from a CSV file.
///
/// The whole file is read at construction; the import loop then drives the
/// cursor without touching the filesystem again. Cells are trimmed at staging
/// time. Rows shorter than the header are legal; their missing cells read as
/// absent.
#[derive(Debug)]
pub struct CsvRowSource {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    cursor: Option<usize>,
    error_rows: Vec<ErrorRow>,
}

impl CsvRowSource {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|v| v.trim().to_string()).collect());
        }

        tracing::debug!(rows = rows.len(), columns = columns.len(), path = %path.display(), "staged csv rows");

        Ok(Self {
            columns,
            rows,
            cursor: None,
            error_rows: Vec::new(),
        })
    }

    /// Builds a source directly from in-memory rows.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows,
            cursor: None,
            error_rows: Vec::new(),
        }
    }

    pub fn error_rows(&self) -> &[ErrorRow] {
        &self.error_rows
    }

    /// Writes the rejected rows to `path` as CSV, with the original columns
    /// followed by an `Import Error` column. Returns the number of rows
    /// written.
    pub fn write_error_rows(&self, path: &Path) -> anyhow::Result<usize> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        header.push("Import Error");
        writer.write_record(&header)?;

        for row in &self.error_rows {
            let mut record: Vec<&str> = Vec::with_capacity(self.columns.len() + 1);
            for i in 0..self.columns.len() {
                record.push(row.values.get(i).map_or("", String::as_str));
            }
            record.push(&row.message);
            writer.write_record(&record)?;
        }
        writer.flush()?;

        Ok(self.error_rows.len())
    }

    fn current(&self) -> Option<&Vec<String>> {
        self.cursor.and_then(|c| self.rows.get(c))
    }
}

impl RowSource for CsvRowSource {
    fn move_next(&mut self) -> bool {
        let next = match self.cursor {
            None => 0,
            Some(c) => c + 1,
        };
        if next < self.rows.len() {
            self.cursor = Some(next);
            true
        } else {
            self.cursor = Some(self.rows.len());
            false
        }
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    fn value(&self, index: usize) -> Option<&str> {
        self.current()
            .and_then(|row| row.get(index))
            .map(String::as_str)
    }

    fn route_current_to_errors(&mut self, message: &str) {
        if let Some(row) = self.current().cloned() {
            self.error_rows.push(ErrorRow {
                values: row,
                message: message.to_string(),
            });
        }
    }

    fn error_count(&self) -> usize {
        self.error_rows.len()
    }
}
