//! Parallel generation pipeline for logsynth.
//!
//! This crate turns a [`GenerationJob`] into a finished artifact: it
//! estimates the chunk count, fans chunk production out across a
//! fixed-size worker pool, and streams completed chunks through a
//! size-bounded, order-restoring assembler.
//!
//! # Architecture
//!
//! ```text
//! GenerationJob
//!       │
//!       ▼
//! ┌──────────────┐   indices    ┌──────────────┐
//! │  WorkerPool  │─────────────▶│ ChunkProducer│  (× workers)
//! └──────┬───────┘              └──────────────┘
//!        │ completed chunks (arbitrary order)
//!        ▼
//! ┌──────────────────────┐
//! │ SizeBoundedAssembler │  reorder by index, stop at byte budget
//! └──────────┬───────────┘
//!            ▼
//!        Artifact
//! ```
//!
//! The pipeline is synchronous from the caller's perspective: `run` does
//! not return until the job completes or fails. A worker failure aborts
//! the whole job and removes the partial artifact; there is no
//! partial-success chunk-skip mode.

pub mod assembler;
pub mod error;
pub mod job;
pub mod metrics;
pub mod pool;
pub mod progress;

// Re-exports for convenience
pub use assembler::{AssemblyStats, SizeBoundedAssembler};
pub use error::PipelineError;
pub use job::{GenerationJob, JobState, DEFAULT_CHUNK_RECORDS};
pub use metrics::GenerateMetrics;
pub use pool::{ChunkStream, WorkerPool};
pub use progress::{LogProgress, NoopProgress, ProgressObserver};

use logsynth_generator::{AccessLogProfile, ChunkProducer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Result of a successful generation run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Path of the finalized artifact.
    pub artifact_path: PathBuf,
    /// Counters and timings.
    pub metrics: GenerateMetrics,
}

/// Orchestrates one generation job from dispatch to finalized artifact.
pub struct GenerationPipeline {
    job: GenerationJob,
    profile: Arc<AccessLogProfile>,
}

impl GenerationPipeline {
    /// Pipeline over the standard access-log profile.
    pub fn new(job: GenerationJob) -> Self {
        Self {
            job,
            profile: Arc::new(AccessLogProfile::standard()),
        }
    }

    /// Replace the sampling profile.
    pub fn with_profile(mut self, profile: AccessLogProfile) -> Self {
        self.profile = Arc::new(profile);
        self
    }

    /// The job this pipeline will run.
    pub fn job(&self) -> &GenerationJob {
        &self.job
    }

    /// Run the job to completion.
    ///
    /// Dispatches all chunks, collects them in completion order, and
    /// assembles the artifact in sequence-index order until the byte
    /// budget is met. Once the budget trips, outstanding workers are
    /// cancelled and their chunks are dropped.
    pub async fn run(
        &self,
        progress: &dyn ProgressObserver,
    ) -> Result<GenerationOutcome, PipelineError> {
        self.job.validate()?;

        let started = Instant::now();
        let mut state = JobState::Pending;
        let chunk_count = self.job.chunk_count();

        info!(
            "Starting generation job: {} bytes target, {} chunks of {} records, {} workers",
            self.job.target_bytes, chunk_count, self.job.chunk_records, self.job.workers
        );

        let producer = ChunkProducer::new(
            Arc::clone(&self.profile),
            self.job.seed,
            self.job.base_date,
        );
        let mut assembler =
            SizeBoundedAssembler::create(&self.job.output_path, self.job.target_bytes)?;

        let cancel = CancellationToken::new();
        let pool = WorkerPool::new(self.job.workers);
        let mut stream = pool.dispatch(
            producer,
            chunk_count,
            self.job.chunk_records,
            cancel.clone(),
        );
        state = transition(state, JobState::Dispatched);

        state = transition(state, JobState::Collecting);
        let mut chunks_generated = 0u64;
        let collect_result = loop {
            let Some(chunk) = stream.recv().await else {
                break Ok(());
            };
            chunks_generated += 1;
            progress.chunk_completed(chunks_generated, chunk_count);

            if let Err(e) = assembler.accept(chunk) {
                break Err(e);
            }
            if assembler.budget_met() {
                debug!("Byte budget met after {chunks_generated} chunks, cancelling the rest");
                cancel.cancel();
                break Ok(());
            }
        };

        // Settle the pool before deciding the job's fate.
        let failures = stream.join().await;

        let artifact_path = assembler.path().to_path_buf();
        if let Err(e) = collect_result {
            // Artifact write failed; no artifact guarantee.
            cancel.cancel();
            return Err(PipelineError::Io(e));
        }
        if !failures.is_empty() {
            // A failed worker means the artifact would be assembled
            // incomplete; discard it instead.
            drop(assembler);
            let _ = std::fs::remove_file(&artifact_path);
            return Err(PipelineError::Generation(failures.join("; ")));
        }

        state = transition(state, JobState::Assembling);
        let stats = assembler.finalize()?;

        let metrics = GenerateMetrics {
            chunks_dispatched: chunk_count,
            chunks_generated,
            chunks_written: stats.chunks_written,
            records_written: stats.records_written,
            bytes_written: stats.bytes_written,
            duration: started.elapsed(),
        };

        transition(state, JobState::Complete);
        info!("Generation complete: {}", metrics.summary());

        Ok(GenerationOutcome {
            artifact_path,
            metrics,
        })
    }
}

fn transition(from: JobState, to: JobState) -> JobState {
    debug!("Job state: {from} -> {to}");
    to
}
