//! The generate-then-upload flow behind `logsynth generate`.

use crate::GenerateOpts;
use anyhow::Context;
use logsynth_pipeline::{
    GenerationJob, GenerationOutcome, GenerationPipeline, LogProgress, PipelineError,
    ProgressObserver,
};
use logsynth_sink::{object_key, BlobSink, S3Sink};
use serde::Serialize;
use tracing::{info, warn};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Outcome of the upload step, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// No remote bucket was configured.
    NotRequested,
    /// Artifact stored remotely; local copy retired.
    Succeeded,
    /// Sink rejected or could not complete the transfer; local artifact
    /// retained for retry by the caller.
    Failed,
}

/// Final result of a generation job.
///
/// `location` is a local filesystem path, or `s3://<bucket>/<key>` after
/// a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub location: String,
    pub upload: UploadStatus,
    pub bytes_written: u64,
    pub records_written: u64,
    pub chunks_written: u64,
    pub chunks_dispatched: u64,
    pub duration_secs: f64,
}

impl JobReport {
    fn from_outcome(outcome: &GenerationOutcome, location: String, upload: UploadStatus) -> Self {
        Self {
            location,
            upload,
            bytes_written: outcome.metrics.bytes_written,
            records_written: outcome.metrics.records_written,
            chunks_written: outcome.metrics.chunks_written,
            chunks_dispatched: outcome.metrics.chunks_dispatched,
            duration_secs: outcome.metrics.duration.as_secs_f64(),
        }
    }

    fn local(outcome: &GenerationOutcome, upload: UploadStatus) -> Self {
        Self::from_outcome(
            outcome,
            outcome.artifact_path.display().to_string(),
            upload,
        )
    }
}

/// Run a full generation job and optionally hand the artifact to S3.
pub async fn run(opts: GenerateOpts) -> anyhow::Result<JobReport> {
    if !opts.size_gb.is_finite() || opts.size_gb < 0.0 {
        return Err(PipelineError::Configuration(format!(
            "target size must be non-negative, got {}",
            opts.size_gb
        ))
        .into());
    }
    let target_bytes = (opts.size_gb * BYTES_PER_GB) as u64;

    let mut job = GenerationJob::new(target_bytes, &opts.output)
        .with_chunk_records(opts.chunk_records);
    if let Some(seed) = opts.seed {
        job = job.with_seed(seed);
    }
    if let Some(workers) = opts.workers {
        job = job.with_workers(workers);
    }

    info!("Generating {:.2} GB of log data...", opts.size_gb);
    let progress = LogProgress;
    let outcome = GenerationPipeline::new(job)
        .run(&progress)
        .await
        .context("Generation job failed")?;
    info!(
        "Generated {:.2} GB of data in {}",
        outcome.metrics.bytes_written as f64 / BYTES_PER_GB,
        outcome.artifact_path.display()
    );

    let report = match &opts.s3_bucket {
        Some(bucket) => {
            let sink = S3Sink::new(bucket).await;
            upload_and_retire(&sink, &outcome, opts.s3_prefix.as_deref(), &progress).await
        }
        None => JobReport::local(&outcome, UploadStatus::NotRequested),
    };

    Ok(report)
}

/// Upload the artifact and retire the local copy on success.
///
/// Upload failure is non-fatal: the job still reports the local path and
/// the artifact stays on disk for the caller to retry.
async fn upload_and_retire(
    sink: &dyn BlobSink,
    outcome: &GenerationOutcome,
    prefix: Option<&str>,
    progress: &dyn ProgressObserver,
) -> JobReport {
    let file_name = outcome
        .artifact_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "application_logs.txt".to_string());
    let key = object_key(prefix, &file_name);

    let on_progress = |transferred: u64, total: u64| progress.upload_progress(transferred, total);
    match sink.upload(&outcome.artifact_path, &key, &on_progress).await {
        Ok(()) => {
            if let Err(e) = std::fs::remove_file(&outcome.artifact_path) {
                warn!(
                    "Uploaded but could not remove local artifact {}: {e}",
                    outcome.artifact_path.display()
                );
            }
            JobReport::from_outcome(outcome, sink.location(&key), UploadStatus::Succeeded)
        }
        Err(e) => {
            warn!("Upload failed, keeping local artifact: {e}");
            JobReport::local(outcome, UploadStatus::Failed)
        }
    }
}
