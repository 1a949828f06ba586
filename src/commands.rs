//! CLI command definitions
//!
//! Defines the clap commands for the stepmode CLI — the external-operator
//! side of the command channel protocol.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Release exactly one step, then block again
    Step {
        /// Path to the command channel file (default: step.txt)
        #[arg(long)]
        channel: Option<PathBuf>,

        /// Wait until the running suite consumes the command
        #[arg(long, short)]
        wait: bool,
    },

    /// Resume the suite at full speed for the rest of the run
    Play {
        /// Path to the command channel file (default: step.txt)
        #[arg(long)]
        channel: Option<PathBuf>,

        /// Wait until the running suite consumes the command
        #[arg(long, short)]
        wait: bool,
    },

    /// Abort the run
    Stop {
        /// Path to the command channel file (default: step.txt)
        #[arg(long)]
        channel: Option<PathBuf>,

        /// Wait until the running suite consumes the command
        #[arg(long, short)]
        wait: bool,
    },

    /// Execute ad-hoc step text in the running scenario
    Inject {
        /// Step text to execute (e.g. "When I press \"OK\"")
        text: String,

        /// Path to the command channel file (default: step.txt)
        #[arg(long)]
        channel: Option<PathBuf>,

        /// Wait until the running suite consumes the command
        #[arg(long, short)]
        wait: bool,
    },

    /// Wait until the pending command, if any, has been consumed
    Wait {
        /// Path to the command channel file (default: step.txt)
        #[arg(long)]
        channel: Option<PathBuf>,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Follow a report stream file, colorizing step results (like tail -f)
    Tail {
        /// Path to the report stream file
        path: PathBuf,

        /// Print existing content before following
        #[arg(long)]
        from_start: bool,
    },

    /// Execute a replay script defined in a YAML file
    Test {
        /// Path to the YAML replay script
        path: PathBuf,

        /// Verbose output (prints the captured stream)
        #[arg(long, short)]
        verbose: bool,

        /// Output the result as JSON
        #[arg(long)]
        json: bool,
    },
}
