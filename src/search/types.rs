//! Progress reporting for the search loop.

use crate::error::Result;

/// Lifecycle of a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Running,
    /// Terminal. Entered on cancellation or when the iteration budget runs out.
    Stopped,
}

/// One committed step: seconds since the run began and the accepted
/// aggregate score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    pub elapsed_seconds: f64,
    pub score: f64,
}

/// Receives a sample for every committed step, as it happens.
///
/// Implementations should make each sample durable promptly so that
/// progress survives an interruption.
pub trait ProgressSink {
    fn record(&mut self, sample: ProgressSample) -> Result<()>;
}

impl ProgressSink for Vec<ProgressSample> {
    fn record(&mut self, sample: ProgressSample) -> Result<()> {
        self.push(sample);
        Ok(())
    }
}

/// Discards every sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn record(&mut self, _sample: ProgressSample) -> Result<()> {
        Ok(())
    }
}
