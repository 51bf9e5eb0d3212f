//! Generation job configuration and the job state machine.

use crate::error::PipelineError;
use chrono::NaiveDate;
use logsynth_generator::AVERAGE_RECORD_BYTES;
use std::fmt;
use std::path::PathBuf;

/// Default number of records per chunk.
pub const DEFAULT_CHUNK_RECORDS: u64 = 1000;

/// The overall generation request.
///
/// Chunk count is estimated up front from an average-record-size
/// heuristic, so the realized artifact size may slightly exceed the
/// target; truncation granularity is one whole chunk (see
/// [`crate::assembler::SizeBoundedAssembler`]).
#[derive(Debug, Clone)]
pub struct GenerationJob {
    /// Target artifact size in bytes.
    pub target_bytes: u64,
    /// Records per chunk.
    pub chunk_records: u64,
    /// Number of parallel workers.
    pub workers: usize,
    /// Seed all chunk RNGs are derived from.
    pub seed: u64,
    /// Upper bound for generated record dates; captured at job creation
    /// so output does not depend on wall-clock time during generation.
    pub base_date: NaiveDate,
    /// Where the artifact is written.
    pub output_path: PathBuf,
}

impl GenerationJob {
    /// Create a job with default chunk size, host parallelism and a
    /// random seed.
    pub fn new(target_bytes: u64, output_path: impl Into<PathBuf>) -> Self {
        Self {
            target_bytes,
            chunk_records: DEFAULT_CHUNK_RECORDS,
            workers: default_workers(),
            seed: rand::random(),
            base_date: chrono::Utc::now().date_naive(),
            output_path: output_path.into(),
        }
    }

    /// Set the job seed for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of records per chunk.
    pub fn with_chunk_records(mut self, chunk_records: u64) -> Self {
        self.chunk_records = chunk_records;
        self
    }

    /// Set the worker pool size.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Anchor generated dates to a fixed date.
    pub fn with_base_date(mut self, base_date: NaiveDate) -> Self {
        self.base_date = base_date;
        self
    }

    /// Validate job parameters. Fatal before any work starts.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.chunk_records == 0 {
            return Err(PipelineError::Configuration(
                "chunk size must be at least one record".into(),
            ));
        }
        if self.workers == 0 {
            return Err(PipelineError::Configuration(
                "worker count must be at least one".into(),
            ));
        }
        Ok(())
    }

    /// Total number of chunks to dispatch.
    ///
    /// `ceil(estimated_entries / chunk_records)` with
    /// `estimated_entries = target_bytes / AVERAGE_RECORD_BYTES`, and at
    /// least one chunk even for a zero-byte target.
    pub fn chunk_count(&self) -> u64 {
        let estimated_entries = self.target_bytes / AVERAGE_RECORD_BYTES;
        estimated_entries.div_ceil(self.chunk_records).max(1)
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Lifecycle of a generation job.
///
/// `Collecting` spans the receive-and-flush loop; `Assembling` is the
/// final drain of the reorder buffer once the chunk supply is exhausted
/// or the byte budget trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Dispatched,
    Collecting,
    Assembling,
    Complete,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Pending => "pending",
            JobState::Dispatched => "dispatched",
            JobState::Collecting => "collecting",
            JobState::Assembling => "assembling",
            JobState::Complete => "complete",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_count_rounds_up() {
        // 250_000 bytes / 200 = 1250 records -> 2 chunks of 1000.
        let job = GenerationJob::new(250_000, "/tmp/out.log");
        assert_eq!(job.chunk_count(), 2);
    }

    #[test]
    fn test_chunk_count_exact_division() {
        // 400_000 bytes / 200 = 2000 records -> exactly 2 chunks.
        let job = GenerationJob::new(400_000, "/tmp/out.log");
        assert_eq!(job.chunk_count(), 2);
    }

    #[test]
    fn test_chunk_count_zero_target_is_one() {
        let job = GenerationJob::new(0, "/tmp/out.log");
        assert_eq!(job.chunk_count(), 1);
    }

    #[test]
    fn test_chunk_count_small_target_is_one() {
        let job = GenerationJob::new(150, "/tmp/out.log");
        assert_eq!(job.chunk_count(), 1);
    }

    #[test]
    fn test_validate_rejects_zero_chunk_records() {
        let job = GenerationJob::new(1000, "/tmp/out.log").with_chunk_records(0);
        assert!(matches!(
            job.validate(),
            Err(PipelineError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let job = GenerationJob::new(1000, "/tmp/out.log").with_workers(0);
        assert!(matches!(
            job.validate(),
            Err(PipelineError::Configuration(_))
        ));
    }

    #[test]
    fn test_builder_methods() {
        let job = GenerationJob::new(1000, "/tmp/out.log")
            .with_seed(42)
            .with_chunk_records(10)
            .with_workers(2);

        assert_eq!(job.seed, 42);
        assert_eq!(job.chunk_records, 10);
        assert_eq!(job.workers, 2);
        assert!(job.validate().is_ok());
    }
}
