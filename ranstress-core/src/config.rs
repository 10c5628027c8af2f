//! Attack configuration and validation
//!
//! An [`AttackConfig`] describes one flooding run. It is validated once,
//! before any socket is opened, and is immutable for the lifetime of the
//! run.

use crate::{Error, Result};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Transport used to deliver payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Connection-oriented: connect, write, optionally wait for a reply
    Tcp,
    /// Connectionless: single datagram per send, fire and forget
    Udp,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Tcp => write!(f, "TCP"),
            Transport::Udp => write!(f, "UDP"),
        }
    }
}

impl FromStr for Transport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Transport::Tcp),
            "udp" => Ok(Transport::Udp),
            other => Err(Error::invalid_config(
                "transport",
                format!("expected 'tcp' or 'udp', got '{other}'"),
            )),
        }
    }
}

/// Pacing policy applied between sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatePolicy {
    /// Sleep a uniform random delay in `[min, max]` between sends,
    /// per worker
    FixedDelay { min: Duration, max: Duration },
    /// Send `burst` messages back-to-back, then sleep `pause`
    BurstThenPause { burst: u32, pause: Duration },
    /// Aggregate messages/sec ceiling shared across all workers
    TargetRate { messages_per_sec: u64 },
}

impl RatePolicy {
    fn validate(&self) -> Result<()> {
        match self {
            RatePolicy::FixedDelay { min, max } => {
                if min > max {
                    return Err(Error::invalid_config(
                        "delay",
                        format!("min delay {min:?} exceeds max delay {max:?}"),
                    ));
                }
            }
            RatePolicy::BurstThenPause { burst, .. } => {
                if *burst == 0 {
                    return Err(Error::invalid_config("burst", "burst size must be >= 1"));
                }
            }
            RatePolicy::TargetRate { messages_per_sec } => {
                if *messages_per_sec == 0 {
                    return Err(Error::invalid_config("rate", "target rate must be >= 1"));
                }
            }
        }
        Ok(())
    }
}

/// Configuration for one flooding run
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Target IP address
    pub target_ip: IpAddr,
    /// Target port
    pub target_port: u16,
    /// Transport to flood over
    pub transport: Transport,
    /// Number of concurrent workers
    pub workers: usize,
    /// Total run duration
    pub duration: Duration,
    /// Pacing policy
    pub rate: RatePolicy,
    /// Name of the payload profile (statistics/report label only)
    pub profile: String,
    /// How long to wait for a reply after a TCP write. Zero disables
    /// the response read entirely.
    pub response_timeout: Duration,
    /// Bound on TCP connect attempts
    pub connect_timeout: Duration,
    /// Interval between progress log lines
    pub progress_interval: Duration,
    /// Grace period a worker gets to observe cancellation before it is
    /// abandoned
    pub shutdown_grace: Duration,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            target_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            target_port: 2001,
            transport: Transport::Tcp,
            workers: 10,
            duration: Duration::from_secs(60),
            rate: RatePolicy::FixedDelay {
                min: Duration::from_millis(1),
                max: Duration::from_millis(1),
            },
            profile: String::new(),
            response_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
            progress_interval: Duration::from_secs(10),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

impl AttackConfig {
    /// Validate the configuration
    ///
    /// Called by the controller before any resource is allocated. An
    /// invalid config fails fast without starting workers.
    pub fn validate(&self) -> Result<()> {
        if self.workers < 1 {
            return Err(Error::invalid_config("workers", "worker count must be >= 1"));
        }
        if self.duration.is_zero() {
            return Err(Error::invalid_config("duration", "duration must be > 0"));
        }
        if self.target_port == 0 {
            return Err(Error::invalid_config(
                "target_port",
                "port must be in [1, 65535]",
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(Error::invalid_config(
                "connect_timeout",
                "connect timeout must be > 0",
            ));
        }
        if self.shutdown_grace.is_zero() {
            return Err(Error::invalid_config(
                "shutdown_grace",
                "shutdown grace must be > 0",
            ));
        }
        if self.progress_interval.is_zero() {
            return Err(Error::invalid_config(
                "progress_interval",
                "progress interval must be > 0",
            ));
        }
        self.rate.validate()
    }

    /// Target as a socket address
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.target_ip, self.target_port)
    }
}
