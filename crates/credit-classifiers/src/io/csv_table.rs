//! CSV reader/writer for uploaded tables and results.
use std::path::Path;

use anyhow::{Context, Result};

use crate::table::{InputTable, RawRecord, ResultRow, ResultsTable, RowOutcome};

/// Marker written in the prediction column for rows that failed encoding.
pub const ERROR_MARKER: &str = "could not classify";

/// Read a comma-delimited file into an `InputTable`. The reader is flexible
/// about field counts so a ragged row surfaces later as a row-level schema
/// error instead of aborting the whole read.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<InputTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open input file: {}", path.as_ref().display()))?;

    let header: Vec<String> = reader
        .headers()
        .context("Failed to read header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        rows.push(RawRecord::new(
            record.iter().map(|v| v.to_string()).collect(),
        ));
    }

    Ok(InputTable { header, rows })
}

/// Write a results table: all original columns plus `Predicted_Credit_Score`
/// and, optionally, `Confidence`. Row count and order match the input;
/// failed rows carry the error marker and an empty confidence field.
pub fn write_results<P: AsRef<Path>>(
    path: P,
    results: &ResultsTable,
    with_confidence: bool,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create output file: {}", path.as_ref().display()))?;

    let mut header = results.header.clone();
    header.push("Predicted_Credit_Score".to_string());
    if with_confidence {
        header.push("Confidence".to_string());
    }
    writer.write_record(&header).context("Failed to write header")?;

    for (row_idx, row) in results.rows.iter().enumerate() {
        let record = render_row(row, &results.header, with_confidence);
        writer
            .write_record(&record)
            .with_context(|| format!("Failed to write row {}", row_idx + 1))?;
    }

    writer.flush().context("Failed to flush output")?;
    Ok(())
}

fn render_row(row: &ResultRow, header: &[String], with_confidence: bool) -> Vec<String> {
    // Ragged input rows are padded/truncated back to the header width so the
    // output stays rectangular.
    let mut record: Vec<String> = (0..header.len())
        .map(|i| row.record.values.get(i).cloned().unwrap_or_default())
        .collect();
    match &row.outcome {
        RowOutcome::Classified(result) => {
            record.push(result.label.clone());
            if with_confidence {
                record.push(format!("{:.4}", result.confidence));
            }
        }
        RowOutcome::Failed(_) => {
            record.push(ERROR_MARKER.to_string());
            if with_confidence {
                record.push(String::new());
            }
        }
    }
    record
}
