//! Flooding attack engine
//!
//! This crate provides the concurrent core of ranstress:
//!
//! - `CancelToken`: shared, idempotent cancellation signal
//! - `RateLimiter`: cancellable pacing (fixed delay, burst, token bucket)
//! - `Sender`: per-send TCP/UDP transport with bounded timeouts
//! - `WorkerPool`: bounded set of workers with graceful shutdown
//! - `AttackController`: run orchestration and final report handoff
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ranstress_core::{AttackConfig, FixedPayload};
//! use ranstress_engine::AttackController;
//!
//! #[tokio::main]
//! async fn main() -> ranstress_core::Result<()> {
//!     let config = AttackConfig::default();
//!     let generator = Arc::new(FixedPayload::new(vec![0x01, 0x02], "replay")?);
//!     let controller = AttackController::new(config, generator)?;
//!     let report = controller.run().await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod controller;
pub mod rate;
pub mod sender;
pub mod worker;

pub use cancel::CancelToken;
pub use controller::{AttackController, RunState};
pub use rate::{RateLimiter, TokenBucket};
pub use sender::Sender;
pub use worker::{StopReport, WorkerPool};
