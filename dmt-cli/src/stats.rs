//! Timing statistics and run summaries.

use std::time::Duration;

use dmt_core::CriticalCounts;

/// Latency statistics in microseconds.
#[derive(Debug, Clone)]
pub struct LatencyStats {
    pub avg_us: f64,
    pub min_us: f64,
    pub max_us: f64,
    pub p50_us: f64,
    pub p95_us: f64,
    pub p99_us: f64,
}

/// Calculate percentile statistics from a list of durations.
pub fn calculate_percentiles(times: &[Duration]) -> LatencyStats {
    if times.is_empty() {
        return LatencyStats {
            avg_us: 0.0,
            min_us: 0.0,
            max_us: 0.0,
            p50_us: 0.0,
            p95_us: 0.0,
            p99_us: 0.0,
        };
    }

    let mut sorted: Vec<f64> = times.iter().map(|d| d.as_secs_f64() * 1e6).collect();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let sum: f64 = sorted.iter().sum();

    LatencyStats {
        avg_us: sum / n as f64,
        min_us: sorted[0],
        max_us: sorted[n - 1],
        p50_us: percentile(&sorted, 50.0),
        p95_us: percentile(&sorted, 95.0),
        p99_us: percentile(&sorted, 99.0),
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (p / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Format a large number with K/M/G suffixes.
pub fn format_number(n: usize) -> String {
    if n >= 1_000_000_000 {
        format!("{:.1}G", n as f64 / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1e3)
    } else {
        format!("{}", n)
    }
}

/// What one `dmt` invocation did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Number of axes.
    pub dimension: usize,
    /// Bits per axis of the sample grid.
    pub bits: u32,
    /// Cells of the double-resolution complex.
    pub cells: usize,
    /// Critical cells per rank of the final build.
    pub counts: CriticalCounts,
    /// Gradient construction time over all repetitions.
    pub timing: LatencyStats,
    /// Number of timed builds.
    pub builds: usize,
}

impl RunSummary {
    /// Collects a summary from the build durations.
    pub fn new(
        dimension: usize,
        bits: u32,
        cells: usize,
        counts: CriticalCounts,
        times: &[Duration],
    ) -> Self {
        Self {
            dimension,
            bits,
            cells,
            counts,
            timing: calculate_percentiles(times),
            builds: times.len(),
        }
    }

    /// Cells resolved per second, from the average build time.
    pub fn cells_per_second(&self) -> f64 {
        if self.timing.avg_us > 0.0 {
            self.cells as f64 / (self.timing.avg_us * 1e-6)
        } else {
            0.0
        }
    }

    /// Writes the summary to the log at `info` level.
    pub fn log(&self) {
        let side = 1usize << self.bits;
        log::info!(
            "grid {}^{} ({} cells): {}",
            side,
            self.dimension,
            format_number(self.cells),
            self.counts
        );
        log::info!(
            "build time avg {:.1} us (min {:.1}, p50 {:.1}, p95 {:.1}, p99 {:.1}, max {:.1}) over {} builds, {} cells/s",
            self.timing.avg_us,
            self.timing.min_us,
            self.timing.p50_us,
            self.timing.p95_us,
            self.timing.p99_us,
            self.timing.max_us,
            self.builds,
            format_number(self.cells_per_second() as usize)
        );
        if self.counts.euler_characteristic() != 0 {
            log::warn!(
                "euler characteristic is {}, expected 0 on a torus",
                self.counts.euler_characteristic()
            );
        }
    }
}
