//! Chunked record production.
//!
//! A chunk is the atomic unit of parallel work: a batch of records plus
//! the sequence index that fixes its position in the final artifact. The
//! index is assigned by the scheduler at dispatch time and is never
//! derived from completion order.

use crate::fields::SyntheticFieldProvider;
use crate::profile::AccessLogProfile;
use crate::record::LogEntryComposer;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Average rendered record size in bytes, used for chunk-count
/// estimation.
pub const AVERAGE_RECORD_BYTES: u64 = 200;

/// An indexed, atomically-produced batch of newline-terminated records.
#[derive(Debug, Clone)]
pub struct Chunk {
    index: u64,
    record_count: u64,
    payload: String,
}

impl Chunk {
    pub fn new(index: u64, record_count: u64, payload: String) -> Self {
        Self {
            index,
            record_count,
            payload,
        }
    }

    /// Position this chunk must occupy in the final artifact.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Number of records in the payload.
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Payload size in bytes.
    pub fn byte_len(&self) -> u64 {
        self.payload.len() as u64
    }

    /// The concatenated newline-terminated records.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// Derive the RNG seed for one chunk from the job seed and the chunk's
/// sequence index.
///
/// This lets any chunk be regenerated in isolation: workers share no
/// random state and output is reproducible from `(job_seed, index)`.
pub fn chunk_seed(job_seed: u64, index: u64) -> u64 {
    job_seed.wrapping_add(index.wrapping_mul(0x9E3779B97F4A7C15))
}

/// Produces chunks of formatted records.
///
/// The producer is immutable and cheap to clone; each `produce` call owns
/// its RNG and provider, so it can run concurrently on any number of
/// workers.
#[derive(Debug, Clone)]
pub struct ChunkProducer {
    profile: Arc<AccessLogProfile>,
    job_seed: u64,
    base_date: NaiveDate,
}

impl ChunkProducer {
    pub fn new(profile: Arc<AccessLogProfile>, job_seed: u64, base_date: NaiveDate) -> Self {
        Self {
            profile,
            job_seed,
            base_date,
        }
    }

    /// Generate a chunk of exactly `record_count` newline-terminated
    /// records tagged with sequence index `index`.
    pub fn produce(&self, record_count: u64, index: u64) -> Chunk {
        let mut rng = StdRng::seed_from_u64(chunk_seed(self.job_seed, index));
        let provider = SyntheticFieldProvider::anchored(self.base_date);
        let composer = LogEntryComposer::new(&self.profile);

        let mut payload = String::with_capacity(record_count as usize * AVERAGE_RECORD_BYTES as usize);
        for _ in 0..record_count {
            payload.push_str(&composer.compose(&mut rng, &provider));
            payload.push('\n');
        }

        Chunk::new(index, record_count, payload)
    }
}
