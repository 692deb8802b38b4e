//! Reads sales CSV files into `SaleRecord` values.

use crate::model::{CsvSaleRow, SaleRecord};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// The header columns a sales file must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["fecha", "producto", "cantidad", "precio"];

/// The outcome of loading a sales file. Rows that failed to parse are reported in `skipped`
/// rather than stopping the load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    records: Vec<SaleRecord>,
    skipped: Vec<String>,
}

impl LoadReport {
    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<SaleRecord> {
        self.records
    }

    /// One message per rejected row, e.g. `line 4: Invalid cantidad 'x'`.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}

/// Loads the sales file at `path`. A missing or unreadable file is an error; bad rows are not.
pub async fn load(path: &Path) -> Result<LoadReport> {
    let content = utils::read(path)
        .await
        .with_context(|| format!("Unable to load sales data from {}", path.display()))?;
    let report = parse(content.trim_start_matches('\u{feff}').as_bytes())
        .with_context(|| format!("Unable to parse sales data in {}", path.display()))?;
    debug!(
        "Loaded {} records from {} ({} skipped)",
        report.records.len(),
        path.display(),
        report.skipped.len()
    );
    Ok(report)
}

/// Parses sales CSV data from any reader.
pub fn parse(reader: impl Read) -> Result<LoadReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .context("Unable to read the CSV header row")?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            bail!(
                "The CSV header is missing the '{column}' column, expected {}",
                REQUIRED_COLUMNS.join(",")
            );
        }
    }

    let mut report = LoadReport::default();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                report.skip(line, &anyhow::Error::from(e));
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let parsed = record
            .deserialize::<CsvSaleRow>(Some(&headers))
            .map_err(anyhow::Error::from)
            .and_then(SaleRecord::try_from);
        match parsed {
            Ok(sale) => report.records.push(sale),
            Err(e) => report.skip(line, &e),
        }
    }
    Ok(report)
}

impl LoadReport {
    fn skip(&mut self, line: u64, e: &anyhow::Error) {
        let message = format!("line {line}: {e:#}");
        warn!("Skipping row at {message}");
        self.skipped.push(message);
    }
}
