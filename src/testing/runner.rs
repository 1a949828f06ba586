//! Replay script execution
//!
//! Runs a scripted feature lifecycle through a real reporter — and, when the
//! script carries a command sequence, a real controller fed over a real
//! channel file by a background writer — then checks assertions against the
//! captured report stream.

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use colored::Colorize;
use serde::Serialize;

use crate::channel::{Command, CommandChannel};
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::control::StepModeController;
use crate::report::StepReporter;
use crate::runner::Listener;

use super::config::ReplayScript;

/// Poll interval used for replay controllers; faster than the production
/// default so scripted runs finish quickly.
const REPLAY_POLL: Duration = Duration::from_millis(10);

/// How long the command writer waits for consumption before abandoning the
/// rest of its commands. Only reached when the replay has stopped consuming
/// (abort or exhausted steps), so abandoning is always safe.
const WRITER_STALL_LIMIT: Duration = Duration::from_secs(5);

/// Result of a replay run
#[derive(Debug, Serialize)]
pub struct ReplayResult {
    pub name: String,
    pub passed: bool,
    /// Whether a scripted STOP aborted the replay partway
    pub aborted: bool,
    pub checks_run: usize,
    pub checks_total: usize,
    pub error: Option<String>,
}

/// Byte sink shared between the reporter and the controller so their lines
/// interleave in emission order.
#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    fn contents(&self) -> String {
        match self.0.lock() {
            Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => String::new(),
        }
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "replay sink poisoned"))?;
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run a replay script from a YAML file
pub fn run_script(path: &Path, config: &Config, verbose: bool) -> Result<ReplayResult> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Script(format!(
            "Failed to read replay script '{}': {}",
            path.display(),
            e
        ))
    })?;

    let script: ReplayScript = serde_yaml::from_str(&content)
        .map_err(|e| Error::Script(format!("Failed to parse replay script: {e}")))?;

    validate_commands(&script)?;

    println!(
        "\n{} {}",
        "Running Replay:".blue().bold(),
        script.name.white().bold()
    );
    if let Some(desc) = &script.description {
        println!("  {}", desc.dimmed());
    }

    let sink = SharedSink::default();
    let aborted = replay(&script, config, sink.clone())?;
    let stream = sink.contents();

    if verbose {
        println!("\n{}", "Captured stream:".cyan());
        for line in stream.lines() {
            println!("  {}", line.dimmed());
        }
    }

    // Check assertions
    println!("\n{}", "Checks:".cyan());
    let checks_total = script.expect.contains.len() + script.expect.not_contains.len();
    let mut checks_run = 0;

    for expected in &script.expect.contains {
        checks_run += 1;
        if stream.contains(expected) {
            println!("  {} contains {:?}", "✓".green(), expected);
        } else {
            println!("  {} contains {:?}", "✗".red(), expected);
            return Ok(ReplayResult {
                name: script.name,
                passed: false,
                aborted,
                checks_run,
                checks_total,
                error: Some(format!("output does not contain {expected:?}")),
            });
        }
    }

    for forbidden in &script.expect.not_contains {
        checks_run += 1;
        if stream.contains(forbidden) {
            println!("  {} absent {:?}", "✗".red(), forbidden);
            return Ok(ReplayResult {
                name: script.name,
                passed: false,
                aborted,
                checks_run,
                checks_total,
                error: Some(format!("output unexpectedly contains {forbidden:?}")),
            });
        }
        println!("  {} absent {:?}", "✓".green(), forbidden);
    }

    println!("\n{} {}\n", "✓".green().bold(), "Replay Passed".green().bold());

    Ok(ReplayResult {
        name: script.name,
        passed: true,
        aborted,
        checks_run,
        checks_total,
        error: None,
    })
}

/// Drive the scripted lifecycle through a reporter (and controller, when the
/// script has commands). Returns whether a scripted STOP aborted the replay.
fn replay(script: &ReplayScript, config: &Config, sink: SharedSink) -> Result<bool> {
    let mut reporter = StepReporter::standalone(sink.clone()).with_config(&config.report);

    let mut controller = if script.commands.is_empty() {
        None
    } else {
        let channel = CommandChannel::new(replay_channel_path());
        let writer = spawn_command_writer(&channel, &script.commands);
        let controller =
            StepModeController::new(channel.clone(), sink).with_poll_interval(REPLAY_POLL);
        Some((channel, writer, controller))
    };

    // Injected ad-hoc steps have no real runner behind them in a replay;
    // they simply succeed.
    let mut executor = |_: &str| -> Result<()> { Ok(()) };

    let mut aborted = false;

    reporter.feature_name(&script.feature);
    'feature: for scenario in &script.scenarios {
        reporter.scenario_name(&scenario.name);

        for step in &scenario.steps {
            if let Some((_, _, controller)) = &mut controller {
                match controller.before_step(&step.text, &mut executor) {
                    Ok(()) => {}
                    Err(Error::Stopped) => {
                        aborted = true;
                        break 'feature;
                    }
                    Err(e) => return Err(e),
                }
            }
            reporter.before_step(&step.text);
            reporter.step_result(&step.outcome());
        }

        if let Some(outline) = &scenario.outline {
            reporter.before_outline_table();
            for row in &outline.rows {
                reporter.before_table_row();
                for cell in &row.cells {
                    reporter.table_cell(cell);
                }
                reporter.after_table_row(&row.outcome());
            }
        }
    }

    if let Some((channel, writer, _)) = controller {
        writer.join().map_err(|_| {
            Error::Script("command writer thread panicked".to_string())
        })?;
        // A trailing unconsumed command is possible when the replay aborted;
        // leave nothing behind.
        let _ = std::fs::remove_file(channel.path());
    }

    Ok(aborted)
}

/// Background writer posting each scripted command once the previous one has
/// been consumed, exercising the consume-once protocol end to end.
fn spawn_command_writer(
    channel: &CommandChannel,
    commands: &[String],
) -> std::thread::JoinHandle<()> {
    let channel = channel.clone();
    let commands: Vec<Command> = commands.iter().map(|c| Command::parse(c)).collect();

    std::thread::spawn(move || {
        for command in commands {
            let start = Instant::now();
            while channel.pending() {
                if start.elapsed() > WRITER_STALL_LIMIT {
                    return;
                }
                std::thread::sleep(REPLAY_POLL);
            }
            if channel.post(&command).is_err() {
                return;
            }
        }
    })
}

/// Fresh channel file path for this replay, outside the working directory so
/// replays never race a real controller's channel.
fn replay_channel_path() -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!(
        "stepmode-replay-{}-{}.txt",
        std::process::id(),
        nanos
    ))
}

/// Reject command sequences that could stall a replay forever
///
/// STOP and PLAY stop the controller from consuming, so either may only be
/// the final command; without one, there must be a STEP for every scripted
/// step.
fn validate_commands(script: &ReplayScript) -> Result<()> {
    let commands = &script.commands;
    if let Some(pos) = commands.iter().position(|c| c == "STOP" || c == "PLAY") {
        if pos != commands.len() - 1 {
            return Err(Error::Script(format!(
                "'{}' must be the last command; nothing is consumed after it",
                commands[pos]
            )));
        }
    } else if !commands.is_empty() {
        let steps = commands.iter().filter(|c| *c == "STEP").count();
        if steps < script.step_count() {
            return Err(Error::Script(format!(
                "commands release {} of {} steps; add STEP entries or end with PLAY or STOP",
                steps,
                script.step_count()
            )));
        }
    }
    Ok(())
}
