//! Rate control for worker send loops
//!
//! Each worker owns one [`RateLimiter`] built from the configured
//! [`RatePolicy`]. The fixed-delay and burst policies are purely
//! per-worker; the target-rate policy shares one [`TokenBucket`] across
//! all workers so the configured ceiling is an aggregate. Every wait is
//! cancellable and returns as soon as the run is cancelled.

use crate::cancel::CancelToken;
use parking_lot::Mutex;
use rand::Rng;
use ranstress_core::RatePolicy;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Shared pacing clock enforcing an aggregate messages/sec ceiling
///
/// Callers reserve send slots spaced `interval` apart; the lock is held
/// only long enough to advance the slot clock.
#[derive(Debug)]
pub struct TokenBucket {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl TokenBucket {
    pub fn new(messages_per_sec: u64) -> Self {
        let messages_per_sec = messages_per_sec.max(1);
        Self {
            interval: Duration::from_nanos(1_000_000_000 / messages_per_sec),
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Reserve the next send slot, returning how long to wait for it
    pub fn reserve(&self) -> Duration {
        let mut next = self.next_slot.lock();
        let now = Instant::now();
        if *next <= now {
            *next = now + self.interval;
            Duration::ZERO
        } else {
            let wait = *next - now;
            *next += self.interval;
            wait
        }
    }
}

#[derive(Debug)]
enum Mode {
    FixedDelay {
        min: Duration,
        max: Duration,
    },
    Burst {
        size: u32,
        pause: Duration,
        in_burst: u32,
    },
    Shared(Arc<TokenBucket>),
}

/// Per-worker rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    mode: Mode,
    cancel: CancelToken,
}

impl RateLimiter {
    /// Build a limiter for one worker. `bucket` must be `Some` iff the
    /// policy is [`RatePolicy::TargetRate`]; the pool creates one bucket
    /// and hands a clone to every worker.
    pub fn new(policy: &RatePolicy, bucket: Option<Arc<TokenBucket>>, cancel: CancelToken) -> Self {
        let mode = match policy {
            RatePolicy::FixedDelay { min, max } => Mode::FixedDelay {
                min: *min,
                max: *max,
            },
            RatePolicy::BurstThenPause { burst, pause } => Mode::Burst {
                size: *burst,
                pause: *pause,
                in_burst: 0,
            },
            RatePolicy::TargetRate { messages_per_sec } => Mode::Shared(
                bucket.unwrap_or_else(|| Arc::new(TokenBucket::new(*messages_per_sec))),
            ),
        };
        Self { mode, cancel }
    }

    /// Block the calling worker until it may send the next message.
    ///
    /// Returns early (without completing the full delay) when the run
    /// is cancelled.
    pub async fn wait_turn(&mut self) {
        match &mut self.mode {
            Mode::FixedDelay { min, max } => {
                let delay = if min == max {
                    *min
                } else {
                    rand::thread_rng().gen_range(*min..=*max)
                };
                Self::cancellable_sleep(&self.cancel, delay).await;
            }
            Mode::Burst {
                size,
                pause,
                in_burst,
            } => {
                if *in_burst >= *size {
                    *in_burst = 0;
                    Self::cancellable_sleep(&self.cancel, *pause).await;
                }
                *in_burst += 1;
            }
            Mode::Shared(bucket) => {
                let wait = bucket.reserve();
                if !wait.is_zero() {
                    Self::cancellable_sleep(&self.cancel, wait).await;
                }
            }
        }
    }

    async fn cancellable_sleep(cancel: &CancelToken, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tokio::select! {
            _ = sleep(duration) => {}
            _ = cancel.cancelled() => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_delay_paces_sends() {
        let policy = RatePolicy::FixedDelay {
            min: Duration::from_millis(50),
            max: Duration::from_millis(50),
        };
        let mut limiter = RateLimiter::new(&policy, None, CancelToken::new());

        let start = Instant::now();
        for _ in 0..3 {
            limiter.wait_turn().await;
        }
        assert!(start.elapsed() >= Duration::from_millis(140));
    }

    #[tokio::test]
    async fn test_uniform_delay_stays_in_range() {
        let policy = RatePolicy::FixedDelay {
            min: Duration::from_millis(1),
            max: Duration::from_millis(5),
        };
        let mut limiter = RateLimiter::new(&policy, None, CancelToken::new());

        let start = Instant::now();
        limiter.wait_turn().await;
        assert!(start.elapsed() >= Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_burst_then_pause() {
        let policy = RatePolicy::BurstThenPause {
            burst: 5,
            pause: Duration::from_millis(200),
        };
        let mut limiter = RateLimiter::new(&policy, None, CancelToken::new());

        // First burst of 5 goes through without pacing
        let start = Instant::now();
        for _ in 0..5 {
            limiter.wait_turn().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));

        // Sixth call pays the pause
        let start = Instant::now();
        limiter.wait_turn().await;
        assert!(start.elapsed() >= Duration::from_millis(180));
    }

    #[tokio::test]
    async fn test_shared_bucket_enforces_aggregate_rate() {
        let bucket = Arc::new(TokenBucket::new(20)); // 50ms slots
        let policy = RatePolicy::TargetRate {
            messages_per_sec: 20,
        };
        let mut a = RateLimiter::new(&policy, Some(bucket.clone()), CancelToken::new());
        let mut b = RateLimiter::new(&policy, Some(bucket), CancelToken::new());

        let start = Instant::now();
        // 4 slots across two workers: first immediate, rest spaced 50ms
        a.wait_turn().await;
        b.wait_turn().await;
        a.wait_turn().await;
        b.wait_turn().await;
        assert!(start.elapsed() >= Duration::from_millis(130));
    }

    #[tokio::test]
    async fn test_wait_returns_early_on_cancel() {
        let policy = RatePolicy::FixedDelay {
            min: Duration::from_secs(30),
            max: Duration::from_secs(30),
        };
        let cancel = CancelToken::new();
        let mut limiter = RateLimiter::new(&policy, None, cancel.clone());

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        limiter.wait_turn().await;
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
