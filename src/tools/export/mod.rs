//! Export Tools
//!
//! Byte layout matches what downstream spreadsheets already ingest:
//! two-space indented JSON arrays, and CSV with a bare header line, every
//! record cell quoted, rows joined by `\n` and no trailing newline.


use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tools::assemble::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Indented JSON array of records.
pub fn to_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// CSV with a bare `columns` header and one fully quoted row per record.
///
/// Columns missing from a record are written as empty cells.
pub fn to_csv(records: &[Record], columns: &[String]) -> Result<String> {
    let mut out = columns.join(",");
    if records.is_empty() {
        return Ok(out);
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for record in records {
        writer.write_record(columns.iter().map(|c| record.get(c).unwrap_or("")))?;
    }

    let body = String::from_utf8(writer.into_inner()?)?;
    out.push('\n');
    out.push_str(body.strip_suffix('\n').unwrap_or(&body));
    Ok(out)
}

/// Render records in `format`.
pub fn render(records: &[Record], columns: &[String], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(records),
        ExportFormat::Csv => to_csv(records, columns),
    }
}

/// Render and write to `path`.
pub fn write_file(path: &Path, records: &[Record], columns: &[String], format: ExportFormat) -> Result<()> {
    let body = render(records, columns, format)?;
    std::fs::write(path, body)?;
    Ok(())
}
