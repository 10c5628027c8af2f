//! Ranstress Core Library
//!
//! This crate provides the fundamental types for the ranstress flooding
//! engine: configuration, payload generation, send outcomes, statistics
//! aggregation, and error handling.

pub mod config;
pub mod error;
pub mod payload;
pub mod report;
pub mod stats;

// Re-export commonly used types
pub use config::{AttackConfig, RatePolicy, Transport};
pub use error::{Error, Result};
pub use payload::{ByteField, FixedPayload, Payload, PayloadGenerator, RandomizedTemplate};
pub use report::{AttackInfo, AttackReport, RunResults};
pub use stats::{FailReason, RunStats, SendOutcome, StatsAggregator};
