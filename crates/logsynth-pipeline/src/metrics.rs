//! Metrics collected while running a generation job.

use std::time::Duration;

/// Counters and timings for a completed generation job.
#[derive(Debug, Clone, Default)]
pub struct GenerateMetrics {
    /// Chunks dispatched to the worker pool.
    pub chunks_dispatched: u64,
    /// Chunks collected from the worker pool.
    pub chunks_generated: u64,
    /// Chunks written to the artifact (collected minus budget-dropped).
    pub chunks_written: u64,
    /// Records written to the artifact.
    pub records_written: u64,
    /// Bytes written to the artifact.
    pub bytes_written: u64,
    /// Wall-clock duration of the whole job.
    pub duration: Duration,
}

impl GenerateMetrics {
    /// Calculate records per second.
    pub fn records_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.records_written as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.bytes_written as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get a one-line summary of the job.
    pub fn summary(&self) -> String {
        format!(
            "{} records ({} bytes) in {} chunks, {:?} ({:.0} records/sec)",
            self.records_written,
            self.bytes_written,
            self.chunks_written,
            self.duration,
            self.records_per_second(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_per_second() {
        let metrics = GenerateMetrics {
            records_written: 1000,
            duration: Duration::from_secs(10),
            ..Default::default()
        };

        assert_eq!(metrics.records_per_second(), 100.0);
    }

    #[test]
    fn test_zero_duration() {
        let metrics = GenerateMetrics {
            records_written: 1000,
            bytes_written: 5000,
            ..Default::default()
        };

        assert_eq!(metrics.records_per_second(), 0.0);
        assert_eq!(metrics.bytes_per_second(), 0.0);
    }

    #[test]
    fn test_summary_mentions_counters() {
        let metrics = GenerateMetrics {
            chunks_written: 2,
            records_written: 2000,
            bytes_written: 400_000,
            duration: Duration::from_secs(1),
            ..Default::default()
        };

        let summary = metrics.summary();
        assert!(summary.contains("2000 records"));
        assert!(summary.contains("400000 bytes"));
    }
}
