//! Attack orchestration
//!
//! The [`AttackController`] drives one run through the state machine
//! `Configured → Running → Draining → Reported`: validate the config,
//! start the pool, emit periodic progress snapshots, stop on deadline
//! or external cancellation, drain the workers, and hand the final
//! report to the caller.

use crate::cancel::CancelToken;
use crate::worker::WorkerPool;
use chrono::Utc;
use ranstress_core::{AttackConfig, AttackInfo, AttackReport, PayloadGenerator, Result, StatsAggregator};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle states of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Configured,
    Running,
    Draining,
    Reported,
}

/// Orchestrates one flooding run
pub struct AttackController {
    config: AttackConfig,
    generator: Arc<dyn PayloadGenerator>,
    cancel: CancelToken,
    run_id: Uuid,
}

impl std::fmt::Debug for AttackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttackController")
            .field("config", &self.config)
            .field("generator", &self.generator.name())
            .field("run_id", &self.run_id)
            .finish_non_exhaustive()
    }
}

impl AttackController {
    /// Validate the configuration and build a controller.
    ///
    /// Fails fast with `InvalidConfig` before any resource is
    /// allocated.
    pub fn new(config: AttackConfig, generator: Arc<dyn PayloadGenerator>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            generator,
            cancel: CancelToken::new(),
            run_id: Uuid::now_v7(),
        })
    }

    /// Cancellation entry point for external signal handlers.
    ///
    /// Calling `cancel()` on the returned token more than once is
    /// harmless; shutdown runs exactly once.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Execute the run to completion and produce the final report
    pub async fn run(self) -> Result<AttackReport> {
        let started_at = Utc::now();
        let started = Instant::now();
        let deadline = started + self.config.duration;

        info!(
            run = %self.run_id,
            target = %self.config.socket_addr(),
            protocol = %self.config.transport,
            profile = %self.generator.name(),
            workers = self.config.workers,
            duration_secs = self.config.duration.as_secs_f64(),
            "starting flood"
        );

        let mut state = RunState::Running;
        let stats = Arc::new(StatsAggregator::new());
        let mut pool = WorkerPool::new(self.cancel.clone(), self.config.shutdown_grace);
        pool.start(&self.config, self.generator.clone(), stats.clone(), deadline);

        let mut progress = tokio::time::interval(self.config.progress_interval);
        progress.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        progress.tick().await; // first tick fires immediately, discard

        while state == RunState::Running {
            tokio::select! {
                _ = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)) => {
                    info!(run = %self.run_id, "duration elapsed");
                    state = RunState::Draining;
                }
                _ = self.cancel.cancelled() => {
                    info!(run = %self.run_id, "cancellation requested");
                    state = RunState::Draining;
                }
                _ = progress.tick() => {
                    // Snapshot reads atomics only; workers are never
                    // blocked by progress reporting.
                    let snap = stats.snapshot();
                    info!(
                        run = %self.run_id,
                        elapsed_secs = format_args!("{:.1}", started.elapsed().as_secs_f64()),
                        sent = snap.total_sent,
                        responses = snap.total_responses,
                        errors = snap.errors,
                        rate = format_args!("{:.1}", snap.messages_per_second),
                        "progress"
                    );
                }
            }
        }

        debug!(run = %self.run_id, "draining worker pool");
        let stop = pool.stop().await;
        if stop.abandoned > 0 {
            warn!(
                run = %self.run_id,
                abandoned = stop.abandoned,
                "workers abandoned after grace period"
            );
        }

        let snap = stats.snapshot();
        let ended_at = Utc::now();
        let report = AttackReport::new(
            AttackInfo::from_config(&self.config, self.generator.name()),
            &snap,
            stop.abandoned,
            started_at,
            ended_at,
        );

        info!(
            run = %self.run_id,
            sent = snap.total_sent,
            responses = snap.total_responses,
            errors = snap.errors,
            rate = format_args!("{:.1}", snap.messages_per_second),
            response_rate = format_args!("{:.1}", snap.response_rate),
            "flood complete"
        );
        Ok(report)
    }
}
