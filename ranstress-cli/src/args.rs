//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use ranstress_core::{AttackConfig, RatePolicy, Result, Transport};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "ranstress")]
#[command(version, about = "Control-plane flooding stress tool for LTE testbeds", long_about = None)]
pub struct Cli {
    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a flooding attack against a target
    Flood(FloodArgs),

    /// List available attack profiles
    Profiles,
}

#[derive(Args, Debug)]
pub struct FloodArgs {
    /// Target IP address
    #[arg(short = 't', long, default_value = "127.0.0.1")]
    pub target_ip: IpAddr,

    /// Target port
    #[arg(short = 'p', long, default_value = "2001")]
    pub target_port: u16,

    /// Transport protocol (tcp or udp)
    #[arg(short = 'P', long, default_value = "tcp")]
    pub protocol: String,

    /// Attack profile (see `ranstress profiles`)
    #[arg(short = 'a', long, default_value = "rrc-connection-request")]
    pub attack: String,

    /// Number of concurrent workers
    #[arg(short = 'w', long, default_value = "10")]
    pub workers: usize,

    /// Attack duration in seconds
    #[arg(short = 'd', long, default_value = "60")]
    pub duration: u64,

    /// Minimum inter-send delay per worker, in milliseconds
    #[arg(long, default_value = "1")]
    pub delay_min_ms: u64,

    /// Maximum inter-send delay per worker, in milliseconds
    /// (defaults to the minimum, i.e. a constant delay)
    #[arg(long)]
    pub delay_max_ms: Option<u64>,

    /// Send this many messages back-to-back, then pause
    /// (overrides the delay flags)
    #[arg(long)]
    pub burst: Option<u32>,

    /// Pause between bursts, in milliseconds
    #[arg(long, default_value = "50")]
    pub burst_pause_ms: u64,

    /// Aggregate messages/sec ceiling shared across workers
    /// (overrides burst and delay flags)
    #[arg(long)]
    pub rate: Option<u64>,

    /// Response wait after each TCP send, in milliseconds
    /// (0 disables the response read)
    #[arg(long, default_value = "5000")]
    pub response_timeout_ms: u64,

    /// Progress line interval in seconds
    #[arg(long, default_value = "10")]
    pub progress_interval: u64,

    /// Worker shutdown grace period in seconds
    #[arg(long, default_value = "5")]
    pub shutdown_grace: u64,

    /// Directory for the JSON result file
    #[arg(short = 'o', long, default_value = "logs")]
    pub output_dir: PathBuf,

    /// Skip writing the JSON result file
    #[arg(long)]
    pub no_report: bool,
}

impl FloodArgs {
    /// Rate policy precedence: --rate, then --burst, then the delay
    /// range.
    pub fn rate_policy(&self) -> RatePolicy {
        if let Some(messages_per_sec) = self.rate {
            RatePolicy::TargetRate { messages_per_sec }
        } else if let Some(burst) = self.burst {
            RatePolicy::BurstThenPause {
                burst,
                pause: Duration::from_millis(self.burst_pause_ms),
            }
        } else {
            RatePolicy::FixedDelay {
                min: Duration::from_millis(self.delay_min_ms),
                max: Duration::from_millis(self.delay_max_ms.unwrap_or(self.delay_min_ms)),
            }
        }
    }

    /// Assemble the engine configuration (unvalidated; the controller
    /// validates before starting workers)
    pub fn to_config(&self) -> Result<AttackConfig> {
        Ok(AttackConfig {
            target_ip: self.target_ip,
            target_port: self.target_port,
            transport: self.protocol.parse::<Transport>()?,
            workers: self.workers,
            duration: Duration::from_secs(self.duration),
            rate: self.rate_policy(),
            profile: self.attack.clone(),
            response_timeout: Duration::from_millis(self.response_timeout_ms),
            connect_timeout: Duration::from_secs(5),
            progress_interval: Duration::from_secs(self.progress_interval),
            shutdown_grace: Duration::from_secs(self.shutdown_grace),
        })
    }
}
