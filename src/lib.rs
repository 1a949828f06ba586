//! stepmode - step-mode control and streaming reporting for BDD runners
//!
//! This library is a thin control/reporting layer bolted onto an external
//! behavior-driven test runner: a polling [`control::StepModeController`]
//! lets an operator pause, single-step, resume or abort a running suite
//! through command files on disk, and a [`report::StepReporter`] turns the
//! runner's lifecycle callbacks into a line-oriented stream for humans or
//! visualizers tailing it.

pub mod channel;
pub mod cli;
pub mod commands;
pub mod common;
pub mod control;
pub mod report;
pub mod runner;
pub mod testing;

// Re-export commonly used types
pub use channel::{Command, CommandChannel};
pub use common::{Error, Result};
pub use control::StepModeController;
pub use report::StepReporter;
pub use runner::{Listener, NullListener, StepExecutor, StepOutcome, StepStatus};
