//! Spreadsheet access: a row/column cell source plus the ledger record
//! read from each data row.

use std::path::Path;

use anyhow::{Context, Result};
use url::Url;

use crate::config::LedgerConfig;

/// Read-only access to a sheet by 1-based row and column letter.
///
/// Implementations return `None` for missing or empty cells.
pub trait SheetSource {
    fn cell(&self, row: usize, column: &str) -> Option<&str>;
}

/// Zero-based index for a one- or two-letter column label ("A", "AT").
pub fn column_index(label: &str) -> Option<usize> {
    let index = match label.as_bytes() {
        [c] if c.is_ascii_uppercase() => (c - b'A') as usize,
        [c0, c1] if c0.is_ascii_uppercase() && c1.is_ascii_uppercase() => {
            (c0 - b'A') as usize * 26 + (c1 - b'A') as usize + 26
        }
        _ => return None,
    };
    Some(index)
}

/// Sheet loaded from a CSV export of the ledger.
pub struct CsvSheet {
    rows: Vec<Vec<String>>,
}

impl CsvSheet {
    /// Load a CSV file. Rows may be ragged; short rows simply have no
    /// value in the trailing columns.
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to open spreadsheet {}", path.display()))?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record
                .with_context(|| format!("failed to read spreadsheet {}", path.display()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl SheetSource for CsvSheet {
    fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let row = self.rows.get(row.checked_sub(1)?)?;
        let value = row.get(column_index(column)?)?;
        if value.is_empty() {
            None
        } else {
            Some(value.as_str())
        }
    }
}

/// One ledger row, read through the configured column map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRecord {
    pub title: String,
    /// Year of eligibility, adjusted to the real year for reprints.
    pub year: Option<i32>,
    pub reprint: bool,
    pub blog_title: Option<String>,
    pub blog_labels: Vec<String>,
    pub blogger_link: Option<Url>,
}

impl SheetRecord {
    /// Read the record at `row`.
    ///
    /// A malformed year or link is an error; anomalies in a cell's
    /// content beyond that are the caller's business.
    pub fn read(sheet: &dyn SheetSource, row: usize, cfg: &LedgerConfig) -> Result<Self> {
        let cols = &cfg.columns;
        let title = sheet
            .cell(row, &cols.title)
            .map(str::to_string)
            .unwrap_or_default();

        let mut year = None;
        let mut reprint = false;
        if let Some(s) = sheet.cell(row, &cols.year) {
            let mut parsed: i32 = s
                .trim()
                .parse()
                .with_context(|| format!("row {row}, column {}: bad year {s:?}", cols.year))?;
            // Reprints are stored 100 years in the past, so 1912 means a
            // 2012 story reprinted during the blog's coverage window.
            if parsed < cfg.reprint_cutoff {
                parsed += 100;
                reprint = true;
            }
            year = Some(parsed);
        }

        let blog_title = sheet.cell(row, &cols.blog_title).map(str::to_string);
        let blog_labels = sheet
            .cell(row, &cols.blog_labels)
            .map(|s| s.split(',').map(|label| label.trim().to_string()).collect())
            .unwrap_or_default();

        let blogger_link = match sheet.cell(row, &cols.blogger_link) {
            Some(s) => Some(Url::parse(s).with_context(|| {
                format!("row {row}, column {}: bad URL {s:?}", cols.blogger_link)
            })?),
            None => None,
        };

        Ok(Self {
            title,
            year,
            reprint,
            blog_title,
            blog_labels,
            blogger_link,
        })
    }
}
