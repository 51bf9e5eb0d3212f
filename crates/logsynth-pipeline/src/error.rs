//! Error types for the generation pipeline.

use thiserror::Error;

/// Errors that can occur while running a generation job.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid job parameters; fatal before any work starts.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A worker task could not complete. Aborts the whole job; partial
    /// output is discarded rather than assembled incomplete.
    #[error("Generation error: {0}")]
    Generation(String),

    /// The artifact could not be written. Fatal, with no artifact
    /// guarantee.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
