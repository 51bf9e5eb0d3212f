//! S3 blob sink implementation.

use crate::{BlobSink, SinkError, UploadProgress};
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

/// Part size for multipart uploads. S3 requires every part except the
/// last to be at least 5 MiB.
const PART_SIZE: usize = 8 * 1024 * 1024;

/// Files at or below this size go up in a single `PutObject`.
const MULTIPART_THRESHOLD: u64 = PART_SIZE as u64;

/// Stores artifacts in an S3 bucket.
///
/// Creating a client is relatively expensive, so the sink holds one and
/// reuses it across uploads.
pub struct S3Sink {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Sink {
    /// Create a sink for `bucket` using the default AWS credential and
    /// region chain.
    pub async fn new(bucket: impl Into<String>) -> Self {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            bucket: bucket.into(),
        }
    }

    /// Sink backed by an existing client.
    pub fn with_client(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Target bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_whole(
        &self,
        local_path: &Path,
        key: &str,
        file_size: u64,
        progress: UploadProgress<'_>,
    ) -> Result<(), SinkError> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| SinkError::Upload(format!("Failed to read {}: {e}", local_path.display())))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| SinkError::Upload(format!("PutObject to {}: {e}", self.location(key))))?;

        progress(file_size, file_size);
        Ok(())
    }

    async fn put_multipart(
        &self,
        local_path: &Path,
        key: &str,
        file_size: u64,
        progress: UploadProgress<'_>,
    ) -> Result<(), SinkError> {
        let created = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| SinkError::Upload(format!("CreateMultipartUpload: {e}")))?;
        let upload_id = created
            .upload_id()
            .ok_or_else(|| SinkError::Upload("CreateMultipartUpload returned no upload id".into()))?
            .to_string();

        let result = self
            .upload_parts(local_path, key, &upload_id, file_size, progress)
            .await;

        if result.is_err() {
            // Leave no orphaned parts behind; the abort itself is best
            // effort.
            let _ = self
                .client
                .abort_multipart_upload()
                .bucket(&self.bucket)
                .key(key)
                .upload_id(&upload_id)
                .send()
                .await;
        }
        result
    }

    async fn upload_parts(
        &self,
        local_path: &Path,
        key: &str,
        upload_id: &str,
        file_size: u64,
        progress: UploadProgress<'_>,
    ) -> Result<(), SinkError> {
        let mut file = tokio::fs::File::open(local_path).await?;
        let mut completed_parts = Vec::new();
        let mut part_number = 1i32;
        let mut transferred = 0u64;

        loop {
            let mut buf = Vec::with_capacity(PART_SIZE);
            let read = (&mut file)
                .take(PART_SIZE as u64)
                .read_to_end(&mut buf)
                .await?;
            if read == 0 {
                break;
            }

            let part = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(ByteStream::from(buf))
                .send()
                .await
                .map_err(|e| SinkError::Upload(format!("UploadPart {part_number}: {e}")))?;

            completed_parts.push(
                CompletedPart::builder()
                    .set_e_tag(part.e_tag().map(str::to_string))
                    .part_number(part_number)
                    .build(),
            );

            transferred += read as u64;
            progress(transferred, file_size);
            debug!("Uploaded part {part_number} ({transferred}/{file_size} bytes)");
            part_number += 1;
        }

        self.client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(completed_parts))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| SinkError::Upload(format!("CompleteMultipartUpload: {e}")))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl BlobSink for S3Sink {
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        progress: UploadProgress<'_>,
    ) -> Result<(), SinkError> {
        let file_size = tokio::fs::metadata(local_path).await?.len();
        info!(
            "Uploading {} ({} bytes) to {}",
            local_path.display(),
            file_size,
            self.location(key)
        );

        let result = if file_size > MULTIPART_THRESHOLD {
            self.put_multipart(local_path, key, file_size, progress).await
        } else {
            self.put_whole(local_path, key, file_size, progress).await
        };

        match &result {
            Ok(()) => info!("Successfully uploaded to {}", self.location(key)),
            Err(e) => warn!("Upload to {} failed: {e}", self.location(key)),
        }
        result
    }

    fn location(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}
