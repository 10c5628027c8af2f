//! Worker pool
//!
//! Each worker is one tokio task looping {generate → rate-limit → send
//! → record} until cancellation or the run deadline. `stop()` joins
//! every worker with a bounded grace period; workers that fail to honor
//! cancellation in time are aborted and counted as abandoned rather
//! than crashing the run. A pool is single-use: a fresh run requires a
//! fresh pool.

use crate::cancel::CancelToken;
use crate::rate::{RateLimiter, TokenBucket};
use crate::sender::Sender;
use ranstress_core::{AttackConfig, PayloadGenerator, RatePolicy, SendOutcome, StatsAggregator};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Log the first failure per worker, then one in every N
const ERROR_LOG_SAMPLE: u64 = 1000;

/// How `stop()` resolved each worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StopReport {
    /// Workers that exited within the grace period
    pub exited: usize,
    /// Workers aborted after exceeding the grace period
    pub abandoned: usize,
}

struct WorkerHandle {
    id: usize,
    task: JoinHandle<u64>,
}

/// Bounded set of concurrent flood workers
pub struct WorkerPool {
    cancel: CancelToken,
    grace: Duration,
    handles: Vec<WorkerHandle>,
}

impl WorkerPool {
    pub fn new(cancel: CancelToken, grace: Duration) -> Self {
        Self {
            cancel,
            grace,
            handles: Vec::new(),
        }
    }

    /// Number of workers currently tracked by the pool
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Spawn all workers. Each gets its own rate limiter and sender;
    /// only the stats aggregator and the cancellation token are shared.
    pub fn start(
        &mut self,
        config: &AttackConfig,
        generator: Arc<dyn PayloadGenerator>,
        stats: Arc<StatsAggregator>,
        deadline: Instant,
    ) {
        let bucket = match &config.rate {
            RatePolicy::TargetRate { messages_per_sec } => {
                Some(Arc::new(TokenBucket::new(*messages_per_sec)))
            }
            _ => None,
        };

        let stride = config.workers as u64;
        for id in 0..config.workers {
            let limiter = RateLimiter::new(&config.rate, bucket.clone(), self.cancel.clone());
            let sender = Sender::new(config);
            let task = tokio::spawn(worker_loop(
                id,
                stride,
                generator.clone(),
                limiter,
                sender,
                stats.clone(),
                self.cancel.clone(),
                deadline,
            ));
            self.handles.push(WorkerHandle { id, task });
        }
        debug!(workers = config.workers, "worker pool started");
    }

    /// Signal cancellation and join every worker.
    ///
    /// Does not return until each worker has either exited or been
    /// explicitly abandoned after the grace period. Abandoned workers
    /// are aborted; their per-send sockets are dropped with the task.
    pub async fn stop(&mut self) -> StopReport {
        self.cancel.cancel();

        let mut report = StopReport::default();
        for handle in self.handles.drain(..) {
            let abort = handle.task.abort_handle();
            match timeout(self.grace, handle.task).await {
                Ok(_) => report.exited += 1,
                Err(_) => {
                    abort.abort();
                    report.abandoned += 1;
                    warn!(worker = handle.id, "worker abandoned after grace period");
                }
            }
        }
        debug!(
            exited = report.exited,
            abandoned = report.abandoned,
            "worker pool stopped"
        );
        report
    }
}

#[allow(clippy::too_many_arguments)]
async fn worker_loop(
    id: usize,
    stride: u64,
    generator: Arc<dyn PayloadGenerator>,
    mut limiter: RateLimiter,
    sender: Sender,
    stats: Arc<StatsAggregator>,
    cancel: CancelToken,
    deadline: Instant,
) -> u64 {
    // Sequence numbers interleave across workers: worker i takes
    // i, i+n, i+2n, ... so they are globally unique without shared
    // state.
    let mut seq = id as u64;
    let mut attempts: u64 = 0;
    let mut failures: u64 = 0;

    debug!(worker = id, "worker running");
    while !cancel.is_cancelled() && Instant::now() < deadline {
        let payload = generator.generate(seq);
        limiter.wait_turn().await;
        if cancel.is_cancelled() || Instant::now() >= deadline {
            break;
        }

        let outcome = sender.send(&payload).await;
        if let SendOutcome::Failed(reason) = &outcome {
            failures += 1;
            // Sampled: flood-volume failure rates must not translate
            // into one log line per failure.
            if failures == 1 || failures % ERROR_LOG_SAMPLE == 0 {
                warn!(worker = id, failures, reason = %reason, "send failure");
            }
        }
        stats.record(&outcome);
        seq += stride;
        attempts += 1;
    }

    debug!(worker = id, attempts, "worker stopped");
    attempts
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranstress_core::{ByteField, RandomizedTemplate, Transport};
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn spawn_echo_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 2048];
                    if let Ok(n) = socket.read(&mut buf).await {
                        if n > 0 {
                            let _ = socket.write_all(&buf[..n]).await;
                        }
                    }
                });
            }
        });
        addr
    }

    fn test_generator() -> Arc<dyn PayloadGenerator> {
        Arc::new(
            RandomizedTemplate::new(vec![0u8; 8], vec![ByteField::new(0, 4)], "test").unwrap(),
        )
    }

    fn pool_config(addr: SocketAddr, workers: usize) -> AttackConfig {
        AttackConfig {
            target_ip: addr.ip(),
            target_port: addr.port(),
            transport: Transport::Tcp,
            workers,
            duration: Duration::from_secs(30),
            rate: RatePolicy::FixedDelay {
                min: Duration::from_millis(1),
                max: Duration::from_millis(2),
            },
            response_timeout: Duration::from_secs(10),
            shutdown_grace: Duration::from_secs(2),
            ..Default::default()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pool_sends_and_records() {
        let addr = spawn_echo_server().await;
        let config = pool_config(addr, 4);
        let cancel = CancelToken::new();
        let stats = Arc::new(StatsAggregator::new());
        let mut pool = WorkerPool::new(cancel.clone(), config.shutdown_grace);

        pool.start(
            &config,
            test_generator(),
            stats.clone(),
            Instant::now() + config.duration,
        );
        assert_eq!(pool.len(), 4);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let report = pool.stop().await;

        assert_eq!(report.exited, 4);
        assert_eq!(report.abandoned, 0);
        let snap = stats.snapshot();
        assert!(snap.total_sent > 0);
        assert_eq!(snap.errors, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_cancellation_is_prompt_with_responsive_sink() {
        // 50 workers, 10s response timeout, responsive echo sink:
        // stop() must resolve within the grace period and abandon
        // nobody.
        let addr = spawn_echo_server().await;
        let config = pool_config(addr, 50);
        let cancel = CancelToken::new();
        let stats = Arc::new(StatsAggregator::new());
        let mut pool = WorkerPool::new(cancel.clone(), config.shutdown_grace);

        pool.start(
            &config,
            test_generator(),
            stats.clone(),
            Instant::now() + Duration::from_secs(30),
        );

        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();

        let start = Instant::now();
        let report = pool.stop().await;
        assert!(start.elapsed() < config.shutdown_grace + Duration::from_secs(1));
        assert_eq!(report.abandoned, 0);
        assert_eq!(report.exited, 50);
    }

    #[tokio::test]
    async fn test_stop_on_empty_pool() {
        let mut pool = WorkerPool::new(CancelToken::new(), Duration::from_secs(1));
        let report = pool.stop().await;
        assert_eq!(report.exited, 0);
        assert_eq!(report.abandoned, 0);
    }
}
