//! Output formatting and export for sales data.
//!
//! Supports pretty-printing and JSON logging of reports, and CSV export of
//! filtered records with optional column selection and gzip compression.

use anyhow::{Result, bail};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::records::{Column, SaleRecord};

/// Logs a value at info level using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    info!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `records` as CSV: a header row of column names, then one row per
/// record. Only `columns` are written, in the given order.
pub fn write_csv<W: Write>(writer: W, records: &[SaleRecord], columns: &[Column]) -> Result<()> {
    if columns.is_empty() {
        bail!("at least one column must be selected for export");
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(columns.iter().map(|c| c.header()))?;
    for record in records {
        writer.write_record(columns.iter().map(|c| c.cell(record)))?;
    }
    writer.flush()?;

    Ok(())
}

/// CSV encoding of `records` with every column, as UTF-8 bytes.
pub fn to_csv_bytes(records: &[SaleRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records, &Column::ALL)?;
    Ok(buf)
}

/// File name for an export: `.csv` is appended to `name`, plus `.gz` when
/// compressing. An empty name falls back to `dados`.
pub fn export_file_name(name: &str, gzip: bool) -> String {
    let stem = match name.trim() {
        "" => "dados",
        s => s.strip_suffix(".csv").unwrap_or(s),
    };
    if gzip {
        format!("{}.csv.gz", stem)
    } else {
        format!("{}.csv", stem)
    }
}

/// Exports `records` to `dir`/`name`.csv[.gz] and returns the written path.
///
/// Fails without touching the filesystem when `columns` is empty.
#[tracing::instrument(skip(records, columns), fields(rows = records.len(), columns = columns.len()))]
pub fn export_csv(
    dir: &Path,
    name: &str,
    records: &[SaleRecord],
    columns: &[Column],
    gzip: bool,
) -> Result<PathBuf> {
    if columns.is_empty() {
        bail!("at least one column must be selected for export");
    }

    let path = dir.join(export_file_name(name, gzip));
    let file = File::create(&path)?;

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        write_csv(&mut encoder, records, columns)?;
        encoder.finish()?;
    } else {
        write_csv(file, records, columns)?;
    }

    info!(
        path = %path.display(),
        rows = records.len(),
        columns = columns.len(),
        "Table exported"
    );
    Ok(path)
}
