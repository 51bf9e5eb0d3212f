//! Fixed-size worker pool for parallel chunk production.

use logsynth_generator::{Chunk, ChunkProducer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Fans chunk-production tasks out across a fixed number of workers.
///
/// Workers claim sequence indices from a shared counter and send
/// completed chunks over a bounded channel in whatever order they
/// finish; no ordering is guaranteed or required among in-flight tasks.
/// Reordering is the assembler's job.
pub struct WorkerPool {
    worker_count: usize,
}

/// Handle to a dispatched pool: the unordered stream of completed
/// chunks plus the worker task handles.
pub struct ChunkStream {
    rx: mpsc::Receiver<Chunk>,
    handles: Vec<JoinHandle<()>>,
}

impl ChunkStream {
    /// Receive the next completed chunk, in completion order.
    ///
    /// Returns `None` once every worker has finished and the channel is
    /// drained.
    pub async fn recv(&mut self) -> Option<Chunk> {
        self.rx.recv().await
    }

    /// Stop receiving and wait for all workers to settle.
    ///
    /// Returns the names of workers that did not complete cleanly
    /// (panicked or were aborted); an empty list means every task
    /// settled normally.
    pub async fn join(self) -> Vec<String> {
        // Dropping the receiver unblocks any worker parked on a full
        // channel.
        drop(self.rx);

        let mut failures = Vec::new();
        for (worker, handle) in self.handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                failures.push(format!("worker {worker}: {e}"));
            }
        }
        failures
    }
}

impl WorkerPool {
    pub fn new(worker_count: usize) -> Self {
        Self { worker_count }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Spawn the pool and start producing chunks `0..chunk_count`.
    ///
    /// Each produced chunk is seeded from its own index, so the
    /// assignment of indices to workers does not affect output. The
    /// channel is bounded at twice the pool size, keeping the number of
    /// completed-but-unflushed chunks proportional to the pool rather
    /// than the job.
    ///
    /// Cancelling `cancel` stops all workers at the next chunk
    /// boundary.
    pub fn dispatch(
        &self,
        producer: ChunkProducer,
        chunk_count: u64,
        chunk_records: u64,
        cancel: CancellationToken,
    ) -> ChunkStream {
        let (tx, rx) = mpsc::channel(self.worker_count * 2);
        let next_index = Arc::new(AtomicU64::new(0));

        let mut handles = Vec::with_capacity(self.worker_count);
        for worker in 0..self.worker_count {
            let producer = producer.clone();
            let tx = tx.clone();
            let next_index = Arc::clone(&next_index);
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    if cancel.is_cancelled() {
                        debug!("Worker {worker} stopping on cancellation");
                        break;
                    }
                    let index = next_index.fetch_add(1, Ordering::Relaxed);
                    if index >= chunk_count {
                        break;
                    }
                    let chunk = producer.produce(chunk_records, index);
                    if tx.send(chunk).await.is_err() {
                        // Collector went away; nothing left to produce for.
                        break;
                    }
                }
            }));
        }

        ChunkStream { rx, handles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use logsynth_generator::AccessLogProfile;
    use std::collections::HashSet;

    fn producer() -> ChunkProducer {
        ChunkProducer::new(
            Arc::new(AccessLogProfile::standard()),
            42,
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_pool_produces_every_index_exactly_once() {
        let pool = WorkerPool::new(4);
        let mut stream = pool.dispatch(producer(), 20, 5, CancellationToken::new());

        let mut seen = HashSet::new();
        while let Some(chunk) = stream.recv().await {
            assert_eq!(chunk.record_count(), 5);
            assert!(seen.insert(chunk.index()), "duplicate index {}", chunk.index());
        }

        assert_eq!(seen, (0..20).collect::<HashSet<_>>());
        assert!(stream.join().await.is_empty());
    }

    #[tokio::test]
    async fn test_single_worker_pool_completes() {
        let pool = WorkerPool::new(1);
        let mut stream = pool.dispatch(producer(), 3, 5, CancellationToken::new());

        let mut count = 0;
        while stream.recv().await.is_some() {
            count += 1;
        }
        assert_eq!(count, 3);
        assert!(stream.join().await.is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_stops_outstanding_work() {
        let pool = WorkerPool::new(2);
        let cancel = CancellationToken::new();
        let mut stream = pool.dispatch(producer(), 10_000, 10, cancel.clone());

        // Take a few chunks, then cancel the rest.
        for _ in 0..3 {
            assert!(stream.recv().await.is_some());
        }
        cancel.cancel();
        assert!(stream.join().await.is_empty());
    }

    #[tokio::test]
    async fn test_chunk_content_independent_of_worker_count() {
        let chunks_for = |workers: usize| async move {
            let pool = WorkerPool::new(workers);
            let mut stream = pool.dispatch(producer(), 6, 10, CancellationToken::new());
            let mut chunks = Vec::new();
            while let Some(chunk) = stream.recv().await {
                chunks.push(chunk);
            }
            stream.join().await;
            chunks.sort_by_key(|c| c.index());
            chunks
                .into_iter()
                .map(|c| c.payload().to_string())
                .collect::<Vec<_>>()
        };

        assert_eq!(chunks_for(1).await, chunks_for(4).await);
    }
}
