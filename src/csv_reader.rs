use anyhow::{anyhow, bail, Context, Result};
use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;
use std::io::Read;

use crate::ir::{RawRecord, MONTHS};

const MONTH_NAMES: [&str; MONTHS] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read a headed CSV table. Zero data rows is not an error here.
pub fn read_csv<R: Read>(input: R) -> Result<CsvData> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        rows.push(row);
    }

    Ok(CsvData { headers, rows })
}

/// Accepts "Jan", "jan", "January" for month index 0, and so on.
fn is_month_header(header: &str, index: usize) -> bool {
    let header = header.trim().to_ascii_lowercase();
    let full = MONTH_NAMES[index];
    header == full || (header.len() == 3 && full.starts_with(&header))
}

/// Check the header layout: one category column followed by Jan..Dec.
pub fn validate_headers(headers: &[String]) -> Result<()> {
    if headers.len() != MONTHS + 1 {
        bail!(
            "Expected {} columns (category + 12 months), found {}",
            MONTHS + 1,
            headers.len()
        );
    }

    if headers[0].trim().is_empty() {
        bail!("Missing category column name");
    }

    for (i, header) in headers[1..].iter().enumerate() {
        if !is_month_header(header, i) {
            return Err(anyhow!(
                "Column {} should be '{}', found '{}'",
                i + 2,
                MONTH_NAMES[i],
                header
            ));
        }
    }

    Ok(())
}

/// Missing, non-numeric or negative cells become `None`. Rainfall can't be
/// below zero, so a negative reading is treated like any other bad cell.
pub fn parse_cell(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

/// Convert a validated table into typed records.
pub fn extract_records(data: &CsvData) -> Result<Vec<RawRecord>> {
    validate_headers(&data.headers)?;

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(data.rows.len());

    for (row_idx, row) in data.rows.iter().enumerate() {
        let category = row[0].trim().to_string();
        if category.is_empty() {
            bail!("Row {} has an empty {} value", row_idx + 1, data.headers[0]);
        }
        if !seen.insert(category.clone()) {
            bail!("Duplicate {} '{}' at row {}", data.headers[0], category, row_idx + 1);
        }

        let mut months = [None; MONTHS];
        for (slot, cell) in months.iter_mut().zip(&row[1..]) {
            *slot = parse_cell(cell);
        }

        records.push(RawRecord { category, months });
    }

    Ok(records)
}

pub fn parse_records<R: Read>(input: R) -> Result<Vec<RawRecord>> {
    let data = read_csv(input)?;
    extract_records(&data)
}
