//! Observational progress reporting.
//!
//! Progress is a side channel only: observers see chunk completion during
//! collection and byte counts during upload, and have no effect on
//! control flow.

use tracing::info;

/// Receives progress notifications from a running job.
pub trait ProgressObserver: Send + Sync {
    /// Called after each chunk is collected from the worker pool.
    fn chunk_completed(&self, completed: u64, total: u64) {
        let _ = (completed, total);
    }

    /// Called as artifact bytes are transferred to a blob sink.
    fn upload_progress(&self, transferred: u64, total: u64) {
        let _ = (transferred, total);
    }
}

/// Observer that ignores all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {}

/// Observer that logs progress at roughly every tenth of the job.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn chunk_completed(&self, completed: u64, total: u64) {
        let step = (total / 10).max(1);
        if completed % step == 0 || completed == total {
            info!("Generated {completed}/{total} chunks");
        }
    }

    fn upload_progress(&self, transferred: u64, total: u64) {
        info!("Uploaded {transferred}/{total} bytes");
    }
}
