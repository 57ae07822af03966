use super::{Dataset, Row};
use crate::{Error, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Serialization formats for a [`Dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::Validation(format!(
                "Unsupported export format: {other}"
            ))),
        }
    }
}

impl Dataset {
    /// Write the rows as a CSV table with a header line.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the rows as a pretty-printed JSON array of records.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.rows)?;
        Ok(())
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let rows = csv_reader
            .deserialize::<Row>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(rows))
    }

    pub fn read_json<R: Read>(reader: R) -> Result<Self> {
        let rows: Vec<Row> = serde_json::from_reader(reader)?;
        Ok(Self::new(rows))
    }

    /// Export to a file, creating parent directories as needed.
    ///
    /// Any failure is reported as [`Error::Export`] naming the target path.
    pub fn export(&self, path: &Path, format: ExportFormat) -> Result<()> {
        tracing::debug!("Exporting {} rows to: {}", self.len(), path.display());

        self.write_file(path, format)
            .map_err(|e| Error::Export(format!("{}: {e}", path.display())))?;

        tracing::info!("Data exported to: {}", path.display());
        Ok(())
    }

    fn write_file(&self, path: &Path, format: ExportFormat) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        match format {
            ExportFormat::Csv => self.write_csv(&mut writer)?,
            ExportFormat::Json => self.write_json(&mut writer)?,
        }
        writer.flush()?;
        Ok(())
    }

    /// Load a dataset previously written by [`export`](Self::export).
    pub fn import(path: &Path, format: ExportFormat) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        match format {
            ExportFormat::Csv => Self::read_csv(reader),
            ExportFormat::Json => Self::read_json(reader),
        }
    }
}
