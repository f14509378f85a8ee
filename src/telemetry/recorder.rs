use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::errors::RecorderError;

use super::sample::{TelemetrySample, HEADERS};

/// Append-only destination for controller telemetry.
pub trait TelemetrySink {
    fn append(&mut self, sample: &TelemetrySample) -> Result<(), RecorderError>;
}

// ---------------------------------------------------------------------------
// CSV recorder
// ---------------------------------------------------------------------------

/// Writes the header immediately, then one flushed row per sample, so a run
/// cut short still leaves every recorded tick on disk.
pub struct CsvRecorder<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> CsvRecorder<W> {
    pub fn new(inner: W) -> Result<Self, RecorderError> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(inner);
        writer.write_record(HEADERS)?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> Result<W, RecorderError> {
        self.writer
            .into_inner()
            .map_err(|e| RecorderError::Io(e.into_error()))
    }
}

impl CsvRecorder<File> {
    /// Create (or truncate) the telemetry file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, RecorderError> {
        let path = path.as_ref();
        info!("recording telemetry to {}", path.display());
        Self::new(File::create(path)?)
    }
}

impl<W: Write> TelemetrySink for CsvRecorder<W> {
    fn append(&mut self, sample: &TelemetrySample) -> Result<(), RecorderError> {
        self.writer.serialize(sample)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory recorder
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct MemoryRecorder {
    pub samples: Vec<TelemetrySample>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TelemetrySink for MemoryRecorder {
    fn append(&mut self, sample: &TelemetrySample) -> Result<(), RecorderError> {
        self.samples.push(*sample);
        Ok(())
    }
}
