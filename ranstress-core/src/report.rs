//! Final run report
//!
//! The persisted JSON shape (`attack_info` + `results`) is what the
//! downstream analysis tooling consumes, so field names are part of the
//! contract.

use crate::stats::RunStats;
use crate::AttackConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Static description of the run
#[derive(Debug, Clone, Serialize)]
pub struct AttackInfo {
    pub target_ip: String,
    pub target_port: u16,
    pub protocol: String,
    pub message_type: String,
    pub num_threads: usize,
    /// Configured duration in seconds
    pub duration: f64,
}

impl AttackInfo {
    pub fn from_config(config: &AttackConfig, message_type: &str) -> Self {
        Self {
            target_ip: config.target_ip.to_string(),
            target_port: config.target_port,
            protocol: config.transport.to_string(),
            message_type: message_type.to_string(),
            num_threads: config.workers,
            duration: config.duration.as_secs_f64(),
        }
    }
}

/// Measured results of the run
#[derive(Debug, Clone, Serialize)]
pub struct RunResults {
    pub total_messages: u64,
    pub total_responses: u64,
    pub response_rate: f64,
    pub messages_per_second: f64,
    pub avg_response_time_ms: f64,
    pub errors: u64,
    pub timeouts: u64,
    pub workers_abandoned: usize,
    /// ISO-8601
    pub start_time: String,
    /// ISO-8601
    pub end_time: String,
}

/// Immutable report handed to the external reporter at run completion
#[derive(Debug, Clone, Serialize)]
pub struct AttackReport {
    pub attack_info: AttackInfo,
    pub results: RunResults,
}

impl AttackReport {
    pub fn new(
        attack_info: AttackInfo,
        stats: &RunStats,
        workers_abandoned: usize,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Self {
        Self {
            attack_info,
            results: RunResults {
                total_messages: stats.total_sent,
                total_responses: stats.total_responses,
                response_rate: stats.response_rate,
                messages_per_second: stats.messages_per_second,
                avg_response_time_ms: stats.avg_response_time_ms,
                errors: stats.errors,
                timeouts: stats.timeouts,
                workers_abandoned,
                start_time: started_at.to_rfc3339(),
                end_time: ended_at.to_rfc3339(),
            },
        }
    }
}

impl fmt::Display for AttackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================")?;
        writeln!(f, "  Flooding Attack Report")?;
        writeln!(f, "==========================================")?;
        writeln!(
            f,
            "Target:            {}:{} ({})",
            self.attack_info.target_ip, self.attack_info.target_port, self.attack_info.protocol
        )?;
        writeln!(f, "Message type:      {}", self.attack_info.message_type)?;
        writeln!(f, "Workers:           {}", self.attack_info.num_threads)?;
        writeln!(f, "Duration:          {:.1}s", self.attack_info.duration)?;
        writeln!(f)?;
        writeln!(f, "Messages sent:     {}", self.results.total_messages)?;
        writeln!(f, "Responses:         {}", self.results.total_responses)?;
        writeln!(f, "Response rate:     {:.2}%", self.results.response_rate)?;
        writeln!(
            f,
            "Throughput:        {:.2} msg/s",
            self.results.messages_per_second
        )?;
        writeln!(
            f,
            "Avg response time: {:.2}ms",
            self.results.avg_response_time_ms
        )?;
        writeln!(f, "Errors:            {}", self.results.errors)?;
        writeln!(f, "Timeouts:          {}", self.results.timeouts)?;
        if self.results.workers_abandoned > 0 {
            writeln!(
                f,
                "Workers abandoned: {}",
                self.results.workers_abandoned
            )?;
        }
        writeln!(f, "Start:             {}", self.results.start_time)?;
        writeln!(f, "End:               {}", self.results.end_time)?;
        writeln!(f, "==========================================")
    }
}
