//! stepmode CLI - the operator side of the step-mode protocol
//!
//! Posts STOP/STEP/PLAY and ad-hoc step commands onto the channel file a
//! suite running in step mode polls, and tails the report stream it emits.

use clap::Parser;
use stepmode::commands::Commands;
use stepmode::{cli, common};

#[derive(Parser)]
#[command(name = "stepmode", about = "Pause, single-step and resume a BDD suite")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    common::logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
