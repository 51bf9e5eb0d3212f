//! Command-line interface for logsynth
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate 1 GB of synthetic access logs locally
//! logsynth generate --size-gb 1.0 --output ./application_logs.txt
//!
//! # Generate and upload to S3, retiring the local artifact on success
//! logsynth generate --size-gb 0.5 \
//!   --output ./application_logs.txt \
//!   --s3-bucket my-bucket --s3-prefix data/
//!
//! # Reproducible output
//! logsynth generate --size-gb 0.1 --seed 42 --workers 4
//! ```

use clap::Parser;
use std::path::PathBuf;

pub mod generate;

pub use generate::{JobReport, UploadStatus};

#[derive(Parser, Clone)]
pub struct GenerateOpts {
    /// Target artifact size in (fractional) gigabytes
    #[arg(long)]
    pub size_gb: f64,

    /// Output path for the generated artifact
    #[arg(long, short = 'o', default_value = "application_logs.txt")]
    pub output: PathBuf,

    /// S3 bucket to upload the finished artifact to (local-only if unset)
    #[arg(long, env = "LOGSYNTH_S3_BUCKET")]
    pub s3_bucket: Option<String>,

    /// Key prefix for the uploaded artifact
    #[arg(long, env = "LOGSYNTH_S3_PREFIX")]
    pub s3_prefix: Option<String>,

    /// Seed for reproducible generation (random if unset)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Records per chunk
    #[arg(long, default_value = "1000")]
    pub chunk_records: u64,

    /// Worker pool size (host parallelism if unset)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Print the job report as JSON
    #[arg(long)]
    pub json: bool,
}
