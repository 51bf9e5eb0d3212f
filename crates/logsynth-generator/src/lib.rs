//! Record generation for the logsynth access-log pipeline.
//!
//! This crate produces realistic, statistically-weighted synthetic access
//! log records. Field values are drawn from weighted category tables
//! ([`profile::CategoryTable`]) and from a pluggable
//! [`fields::FieldValueProvider`], then rendered into a fixed line layout
//! by [`record::LogEntryComposer`]. [`chunk::ChunkProducer`] batches
//! records into indexed chunks, the unit of parallel work consumed by the
//! pipeline crate.
//!
//! Generation is deterministic: every chunk's content is a pure function
//! of `(job_seed, chunk_index)` plus the profile and anchor date, so
//! identical jobs reproduce byte-identical output regardless of how many
//! workers ran them.
//!
//! # Example
//!
//! ```rust
//! use logsynth_generator::{AccessLogProfile, ChunkProducer};
//! use std::sync::Arc;
//!
//! let profile = Arc::new(AccessLogProfile::standard());
//! let base_date = chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let producer = ChunkProducer::new(profile, 42, base_date);
//!
//! let chunk = producer.produce(1000, 0);
//! assert_eq!(chunk.record_count(), 1000);
//! ```

pub mod chunk;
pub mod fields;
pub mod profile;
pub mod record;

// Re-exports for convenience
pub use chunk::{chunk_seed, Chunk, ChunkProducer, AVERAGE_RECORD_BYTES};
pub use fields::{FieldValueProvider, SyntheticFieldProvider};
pub use profile::{AccessLogProfile, CategoryTable, ClientAgent, ProfileError, SizeBand};
pub use record::LogEntryComposer;
