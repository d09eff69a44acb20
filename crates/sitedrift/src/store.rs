use crate::prelude::*;
use sitedrift_core::record::{ComparisonRecord, HEADERS, PERCENTAGE_COLUMN};
use std::fs::{File, OpenOptions};
use std::io::Read;
use std::path::Path;

/// Append-only CSV of comparison results.
///
/// The header row is written only when the file is created, so results from
/// several runs accumulate in one table. Every record is flushed as soon as
/// it is written.
pub struct OutputStore {
    writer: csv::Writer<File>,
}

impl OutputStore {
    pub fn open(path: &Path) -> Result<Self> {
        let write_header = !path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .wrap_err_with(|| format!("Failed to open output store {}", path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            log::debug!("Creating output store {}", path.display());
            writer.write_record(HEADERS)?;
            writer.flush()?;
        }

        Ok(Self { writer })
    }

    pub fn append(&mut self, record: &ComparisonRecord) -> Result<()> {
        self.writer
            .serialize(record)
            .wrap_err_with(|| format!("Failed to write result for {}", record.url))?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Every stored value of the percentage column, as written.
///
/// Rows the CSV reader can't decode are skipped with a warning.
pub fn read_percentages_from<R: Read>(reader: R, source: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let column = reader
        .headers()
        .wrap_err_with(|| format!("Failed to read header of {source}"))?
        .iter()
        .position(|header| header.trim() == PERCENTAGE_COLUMN)
        .ok_or_else(|| Error::MissingColumn {
            path: source.to_string(),
            column: PERCENTAGE_COLUMN.to_string(),
        })?;

    let mut values = Vec::new();
    for (line, row) in reader.records().enumerate() {
        match row {
            Ok(row) => values.push(row.get(column).unwrap_or_default().to_string()),
            Err(err) => log::warn!("Skipping row {} of {source}: {err}", line + 2),
        }
    }

    Ok(values)
}

pub fn read_percentages(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .wrap_err_with(|| format!("Failed to open output store {}", path.display()))?;
    read_percentages_from(file, &path.display().to_string())
}
