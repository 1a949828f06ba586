//! Step-mode controller
//!
//! A polling state machine hooked in before every step of a running suite.
//! While blocking it suspends the runner's own thread until an external
//! controller drops a command on the channel: `STEP` releases one step,
//! `PLAY` releases the rest of the run, `STOP` aborts, and any other text is
//! executed as an ad-hoc step without releasing the loop.
//!
//! The wait is a cooperative hand-off on the thread executing the scenario,
//! not background concurrency, so plain `thread::sleep` is the right tool.

use std::io::Write;
use std::time::Duration;

use tracing::{debug, trace};

use crate::channel::{Command, CommandChannel};
use crate::common::{Error, Result};
use crate::runner::StepExecutor;

/// Default interval between channel polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Blocking pause/step/resume controller, one instance per suite run
///
/// `initialized` and `resumed` are process-lifetime flags: each flips at most
/// once, the first on the first `before_step` call, the second when a `PLAY`
/// command is consumed. Once `resumed` is set the controller never blocks
/// again for the remainder of the run.
pub struct StepModeController<W: Write> {
    channel: CommandChannel,
    poll_interval: Duration,
    out: W,
    initialized: bool,
    resumed: bool,
}

impl<W: Write> StepModeController<W> {
    pub fn new(channel: CommandChannel, out: W) -> Self {
        Self {
            channel,
            poll_interval: DEFAULT_POLL_INTERVAL,
            out,
            initialized: false,
            resumed: false,
        }
    }

    /// Override the poll interval (mainly for tests)
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Whether a past PLAY command has disabled blocking
    pub fn resumed(&self) -> bool {
        self.resumed
    }

    /// Consume the controller, returning its output sink
    pub fn into_output(self) -> W {
        self.out
    }

    /// Hook invoked once per step, before the step's normal execution
    ///
    /// Blocks until the external controller supplies a command, then either
    /// returns `Ok(())` to let the step proceed (`STEP`, `PLAY`) or
    /// `Err(Error::Stopped)` to abort the suite (`STOP`). Ad-hoc step text is
    /// executed through `executor` and reported; it keeps the loop blocking,
    /// so a further command is required before this real step runs.
    ///
    /// There is no timeout: once blocking, the suite waits indefinitely.
    pub fn before_step<E: StepExecutor>(
        &mut self,
        step_text: &str,
        executor: &mut E,
    ) -> Result<()> {
        if !self.initialized {
            self.emit("Step mode initialized")?;
            self.initialized = true;
        }

        if self.resumed {
            return Ok(());
        }

        trace!(step = step_text, "blocking until command");
        loop {
            let Some(command) = self.channel.try_consume()? else {
                std::thread::sleep(self.poll_interval);
                continue;
            };

            match command {
                Command::Stop => {
                    debug!("stop command received, aborting run");
                    return Err(Error::Stopped);
                }
                Command::Step => {
                    debug!(step = step_text, "releasing one step");
                    return Ok(());
                }
                Command::Play => {
                    debug!("resuming at full speed");
                    self.resumed = true;
                    return Ok(());
                }
                Command::AdHoc(text) => {
                    self.run_injected_step(&text, executor)?;
                    // Stay in the loop: a new command is needed before the
                    // next real step proceeds.
                }
            }
        }
    }

    /// Execute injected step text and report the result
    ///
    /// Executor failures are caught and reported here, never re-raised; only
    /// output-sink failures propagate.
    fn run_injected_step<E: StepExecutor>(&mut self, text: &str, executor: &mut E) -> Result<()> {
        self.emit(&format!("Step: {text}"))?;
        match executor.execute(text) {
            Ok(()) => self.emit("Step success"),
            Err(e) => self.emit(&format!("Step failed: {e}")),
        }
    }

    /// Write one line and flush so an external tailer sees it immediately
    fn emit(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}").map_err(Error::Report)?;
        self.out.flush().map_err(Error::Report)
    }
}
