use crate::config::OutputFormat;
use crate::models::RoomRecord;
use anyhow::{ensure, Context, Result};
use std::path::Path;
use tracing::{error, info};

/// Write `records` to `path` in the given format, replacing any existing file
pub fn write_records(records: &[RoomRecord], path: &Path, format: OutputFormat) -> Result<usize> {
    let written = match format {
        OutputFormat::Csv => write_csv(records, path),
        OutputFormat::Json => write_json(records, path),
    };
    match &written {
        Ok(rows) => info!("Data saved to {} ({rows} records)", path.display()),
        Err(e) => error!("Error saving data to {}: {e:#}", path.display()),
    }
    written
}

/// Header row comes from the record's field names
pub fn write_csv(records: &[RoomRecord], path: &Path) -> Result<usize> {
    ensure!(!records.is_empty(), "refusing to write an empty CSV");

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(records.len())
}

pub fn write_json(records: &[RoomRecord], path: &Path) -> Result<usize> {
    ensure!(!records.is_empty(), "refusing to write an empty JSON export");

    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(records.len())
}
