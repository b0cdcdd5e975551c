//! CSV reader for exam submissions.

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::Submission;
use crate::columns::ColumnLayout;

/// Header labels plus raw cell values, as read from the submissions file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SubmissionTable {
    /// Builds one [`Submission`] per row using the sniffed layout. Short rows
    /// read as empty cells.
    pub fn submissions(&self, layout: &ColumnLayout) -> Vec<Submission> {
        fn cell(row: &[String], idx: usize) -> String {
            row.get(idx).cloned().unwrap_or_default()
        }

        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| Submission {
                row: row_idx,
                name: cell(row, layout.name),
                timestamp: layout.timestamp.map(|idx| cell(row, idx)),
                answers: layout.questions.iter().map(|idx| cell(row, *idx)).collect(),
            })
            .collect()
    }
}

/// Reads a header row followed by data rows from any CSV source.
///
/// # Errors
///
/// Returns an error on malformed CSV or when there are no data rows.
pub fn parse_submissions<R: Read>(reader: R) -> Result<SubmissionTable> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("failed to read CSV row {}", idx + 2))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    if rows.is_empty() {
        bail!("submissions file is empty");
    }

    debug!(columns = headers.len(), rows = rows.len(), "Parsed submissions");
    Ok(SubmissionTable { headers, rows })
}

/// Opens and parses the submissions file at `path`.
pub fn read_submissions(path: &Path) -> Result<SubmissionTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("{} not found or unreadable", path.display()))?;
    parse_submissions(file).with_context(|| format!("failed to load {}", path.display()))
}
