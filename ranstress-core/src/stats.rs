//! Thread-safe run statistics
//!
//! Every worker feeds its per-send outcomes into one shared
//! [`StatsAggregator`]. All counters are lock-free atomics so hundreds
//! of workers can record concurrently without contention or lost
//! updates. Derived metrics are computed on snapshot from the integer
//! counters, never accumulated as floats.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Why a send attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    /// Connection refused, unreachable, or connect timeout
    Connect,
    /// Write error mid-transfer, including short writes that could not
    /// be completed
    Write,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailReason::Connect => write!(f, "connect"),
            FailReason::Write => write!(f, "write"),
        }
    }
}

/// Result of one send attempt, consumed exactly once by the aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Payload fully written, no response read
    Sent { bytes: usize, elapsed: Duration },
    /// Payload fully written and a reply arrived within the timeout
    SentWithResponse {
        bytes: usize,
        response_size: usize,
        elapsed: Duration,
    },
    /// Payload fully written but no reply before the timeout. Expected
    /// for fire-and-forget targets; not an error.
    TimedOut,
    /// The payload never fully reached the target
    Failed(FailReason),
}

/// Point-in-time copy of the aggregate counters plus derived metrics
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub total_sent: u64,
    pub total_responses: u64,
    pub timeouts: u64,
    pub errors: u64,
    pub connect_errors: u64,
    pub write_errors: u64,
    pub bytes_sent: u64,
    pub elapsed_secs: f64,
    /// totalSent / elapsed
    pub messages_per_second: f64,
    /// Percentage of sent messages that saw a reply, in [0, 100].
    /// Exactly 0 when nothing was sent.
    pub response_rate: f64,
    pub avg_response_time_ms: f64,
}

/// Shared, thread-safe counter bank
///
/// Created at run start, updated by every worker, frozen into a final
/// [`RunStats`] at run end. Never reused across runs.
#[derive(Debug)]
pub struct StatsAggregator {
    started: Instant,
    total_sent: AtomicU64,
    total_responses: AtomicU64,
    timeouts: AtomicU64,
    errors: AtomicU64,
    connect_errors: AtomicU64,
    write_errors: AtomicU64,
    bytes_sent: AtomicU64,
    response_time_nanos: AtomicU64,
}

/// Floor for elapsed time in derived metrics, guards very short runs
const MIN_ELAPSED_SECS: f64 = 1e-3;

impl StatsAggregator {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            total_sent: AtomicU64::new(0),
            total_responses: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            connect_errors: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            response_time_nanos: AtomicU64::new(0),
        }
    }

    /// Record one send outcome. Safe to call from any worker
    /// concurrently.
    pub fn record(&self, outcome: &SendOutcome) {
        match outcome {
            SendOutcome::Sent { bytes, .. } => {
                self.total_sent.fetch_add(1, Ordering::Relaxed);
                self.bytes_sent.fetch_add(*bytes as u64, Ordering::Relaxed);
            }
            SendOutcome::SentWithResponse { bytes, elapsed, .. } => {
                self.total_sent.fetch_add(1, Ordering::Relaxed);
                self.bytes_sent.fetch_add(*bytes as u64, Ordering::Relaxed);
                self.total_responses.fetch_add(1, Ordering::Relaxed);
                self.response_time_nanos
                    .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
            }
            SendOutcome::TimedOut => {
                self.total_sent.fetch_add(1, Ordering::Relaxed);
                self.timeouts.fetch_add(1, Ordering::Relaxed);
            }
            SendOutcome::Failed(reason) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                match reason {
                    FailReason::Connect => {
                        self.connect_errors.fetch_add(1, Ordering::Relaxed);
                    }
                    FailReason::Write => {
                        self.write_errors.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        }
    }

    /// Consistent point-in-time copy with derived metrics
    ///
    /// Successive snapshots are monotonically non-decreasing in every
    /// counter.
    pub fn snapshot(&self) -> RunStats {
        let total_sent = self.total_sent.load(Ordering::Relaxed);
        let total_responses = self.total_responses.load(Ordering::Relaxed);
        let response_time_nanos = self.response_time_nanos.load(Ordering::Relaxed);
        let elapsed_secs = self.started.elapsed().as_secs_f64();

        let messages_per_second = total_sent as f64 / elapsed_secs.max(MIN_ELAPSED_SECS);
        let response_rate = if total_sent == 0 {
            0.0
        } else {
            total_responses as f64 / total_sent as f64 * 100.0
        };
        let avg_response_time_ms = if total_responses == 0 {
            0.0
        } else {
            response_time_nanos as f64 / total_responses as f64 / 1_000_000.0
        };

        RunStats {
            total_sent,
            total_responses,
            timeouts: self.timeouts.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            connect_errors: self.connect_errors.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            elapsed_secs,
            messages_per_second,
            response_rate,
            avg_response_time_ms,
        }
    }
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
