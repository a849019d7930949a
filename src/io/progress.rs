//! Append-only CSV progress log.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::search::{ProgressSample, ProgressSink};

/// Writes `time,score` rows, one per committed search step.
///
/// Every row is flushed as it is written so a partial log survives an
/// interrupted run.
pub struct ProgressLog<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl ProgressLog<File> {
    /// Creates (truncating) the log file at `path` and writes the header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> ProgressLog<W> {
    /// Wraps a writer and writes the header.
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(["time", "score"])?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Number of rows written after the header.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}

impl<W: Write> ProgressSink for ProgressLog<W> {
    fn record(&mut self, sample: ProgressSample) -> Result<()> {
        self.writer.write_record([
            sample.elapsed_seconds.to_string(),
            sample.score.to_string(),
        ])?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }
}
