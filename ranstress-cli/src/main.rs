//! ranstress binary entry point

mod args;
mod report;

use args::{Cli, Commands, FloodArgs};
use clap::Parser;
use ranstress_core::Result;
use ranstress_engine::AttackController;
use std::process::ExitCode;
use tracing::{error, info};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Profiles => {
            for entry in ranstress_profiles::catalog() {
                println!("{:28} {}", entry.name, entry.description);
            }
            Ok(())
        }
        Commands::Flood(args) => flood(args).await,
    }
}

async fn flood(args: FloodArgs) -> Result<()> {
    let config = args.to_config()?;
    let generator = ranstress_profiles::lookup(&args.attack)?;

    let controller = AttackController::new(config, generator)?;

    // The signal handler owns the single external cancel() call; a
    // second Ctrl-C while draining is absorbed by the idempotent token.
    let cancel = controller.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping");
            cancel.cancel();
        }
    });

    let report = controller.run().await?;
    println!("{report}");

    if !args.no_report {
        let path = report::write_report(&report, &args.output_dir)?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}
