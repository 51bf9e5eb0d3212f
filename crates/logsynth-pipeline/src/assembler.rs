//! Size-bounded, order-restoring artifact assembly.

use logsynth_generator::Chunk;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default buffer size for artifact writing.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Counters for a finished assembly.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssemblyStats {
    /// Bytes written to the artifact.
    pub bytes_written: u64,
    /// Chunks written to the artifact.
    pub chunks_written: u64,
    /// Records written to the artifact.
    pub records_written: u64,
}

/// Writes chunks to the artifact in ascending sequence-index order until
/// a byte budget is met.
///
/// Chunks arrive in arbitrary completion order. Out-of-order arrivals
/// wait in an indexed reorder buffer; whenever the next expected index
/// becomes available, every consecutively-ready chunk is flushed. This
/// bounds memory to the out-of-order window rather than the whole job.
///
/// The budget check runs after each chunk write, so the first chunk is
/// always written (including for a zero-byte target) and the final
/// artifact may overshoot the target by up to one chunk. Exact
/// truncation mid-chunk is deliberately not performed.
pub struct SizeBoundedAssembler {
    writer: BufWriter<File>,
    path: PathBuf,
    target_bytes: u64,
    next_index: u64,
    pending: BTreeMap<u64, Chunk>,
    stats: AssemblyStats,
}

impl SizeBoundedAssembler {
    /// Create the artifact file and an assembler targeting
    /// `target_bytes`.
    pub fn create(path: impl Into<PathBuf>, target_bytes: u64) -> std::io::Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        Ok(Self {
            writer: BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file),
            path,
            target_bytes,
            next_index: 0,
            pending: BTreeMap::new(),
            stats: AssemblyStats::default(),
        })
    }

    /// Path of the artifact being assembled.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accept one completed chunk, flushing every consecutively-ready
    /// chunk starting at the next expected index.
    pub fn accept(&mut self, chunk: Chunk) -> std::io::Result<()> {
        if self.budget_met() || chunk.index() < self.next_index {
            // Late arrivals past the budget are dropped whole.
            return Ok(());
        }
        self.pending.insert(chunk.index(), chunk);
        self.flush_ready()
    }

    fn flush_ready(&mut self) -> std::io::Result<()> {
        while !self.budget_met() {
            let Some(chunk) = self.pending.remove(&self.next_index) else {
                break;
            };
            self.writer.write_all(chunk.payload().as_bytes())?;
            self.stats.bytes_written += chunk.byte_len();
            self.stats.chunks_written += 1;
            self.stats.records_written += chunk.record_count();
            self.next_index += 1;
            debug!(
                "Flushed chunk {} ({} bytes, {} total)",
                chunk.index(),
                chunk.byte_len(),
                self.stats.bytes_written
            );
        }
        if self.budget_met() {
            self.pending.clear();
        }
        Ok(())
    }

    /// Whether the byte budget has been reached.
    ///
    /// Evaluated after writes only: the budget is never considered met
    /// before the first chunk lands, so a zero-byte target still
    /// produces one chunk.
    pub fn budget_met(&self) -> bool {
        self.stats.chunks_written > 0 && self.stats.bytes_written >= self.target_bytes
    }

    /// Sequence index the assembler will write next.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Chunks currently parked out of order.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Counters so far.
    pub fn stats(&self) -> AssemblyStats {
        self.stats
    }

    /// Flush buffered bytes and finalize the artifact.
    ///
    /// Any chunks still parked out of order are dropped; the artifact is
    /// immutable after this call.
    pub fn finalize(mut self) -> std::io::Result<AssemblyStats> {
        self.writer.flush()?;
        Ok(self.stats)
    }
}
