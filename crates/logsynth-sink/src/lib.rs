//! Blob sink abstraction for finished artifacts.
//!
//! The generation pipeline hands a finalized local artifact to a
//! [`BlobSink`] for durable remote storage. The trait keeps the pipeline
//! independent of any particular store; [`s3::S3Sink`] is the bundled
//! implementation.
//!
//! Upload failure is non-fatal to a generation job: callers keep the
//! local artifact and retry on their own terms. No retry policy lives
//! here.

pub mod s3;

pub use s3::S3Sink;

use std::path::Path;

/// Errors that can occur while storing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The sink rejected or could not complete the transfer.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Local artifact could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte-level upload progress callback: `(transferred, total)`.
///
/// Purely observational; implementations must not rely on it for
/// control flow.
pub type UploadProgress<'a> = &'a (dyn Fn(u64, u64) + Send + Sync);

/// Durably stores a finished artifact in remote object storage.
#[async_trait::async_trait]
pub trait BlobSink: Send + Sync {
    /// Upload the file at `local_path` under `key`.
    ///
    /// Reports transferred bytes through `progress` as the upload
    /// advances.
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        progress: UploadProgress<'_>,
    ) -> Result<(), SinkError>;

    /// The remote location string for `key`, e.g. `s3://bucket/key`.
    fn location(&self, key: &str) -> String;
}

/// Build an object key from an optional prefix and the artifact file
/// name.
pub fn object_key(prefix: Option<&str>, file_name: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => {
            format!("{}/{}", prefix.trim_end_matches('/'), file_name)
        }
        _ => file_name.to_string(),
    }
}
