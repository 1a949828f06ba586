//! CLI command handling
//!
//! Dispatches CLI commands: posting to the command channel, waiting for
//! consumption, tailing report streams and running replay scripts.

use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;
use tokio::time::sleep;

use crate::channel::{Command, CommandChannel};
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::testing;

/// Interval between consumption/tail polls on the CLI side
const POLL: Duration = Duration::from_millis(100);

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    let config = Config::load()?;

    match command {
        Commands::Step { channel, wait } => {
            post(channel_for(&config, channel), Command::Step, wait).await
        }

        Commands::Play { channel, wait } => {
            post(channel_for(&config, channel), Command::Play, wait).await
        }

        Commands::Stop { channel, wait } => {
            post(channel_for(&config, channel), Command::Stop, wait).await
        }

        Commands::Inject { text, channel, wait } => {
            post(channel_for(&config, channel), Command::AdHoc(text), wait).await
        }

        Commands::Wait { channel, timeout } => {
            let channel = channel_for(&config, channel);
            wait_consumed(&channel, timeout.map(Duration::from_secs)).await?;
            println!("No command pending on '{}'", channel.path().display());
            Ok(())
        }

        Commands::Tail { path, from_start } => tail(path, from_start).await,

        Commands::Test {
            path,
            verbose,
            json,
        } => {
            let result = testing::run_script(&path, &config, verbose)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            if result.passed {
                Ok(())
            } else {
                Err(Error::ScriptAssertion(
                    result.error.unwrap_or_else(|| "replay failed".to_string()),
                ))
            }
        }
    }
}

/// Channel from --channel override or configuration
fn channel_for(config: &Config, path: Option<PathBuf>) -> CommandChannel {
    CommandChannel::new(path.unwrap_or_else(|| config.channel.path.clone()))
}

/// Post a command, refusing to clobber an unconsumed one
async fn post(channel: CommandChannel, command: Command, wait: bool) -> Result<()> {
    if channel.pending() {
        return Err(Error::Config(format!(
            "A command is already pending on '{}'. Wait for the suite to consume it \
             (stepmode wait) before posting another.",
            channel.path().display()
        )));
    }

    channel.post(&command)?;
    println!("Posted '{}' to '{}'", command, channel.path().display());

    if wait {
        wait_consumed(&channel, None).await?;
        println!("Consumed.");
    }

    Ok(())
}

/// Poll until the channel file disappears (command consumed)
async fn wait_consumed(channel: &CommandChannel, timeout: Option<Duration>) -> Result<()> {
    let start = std::time::Instant::now();
    while channel.pending() {
        if let Some(limit) = timeout {
            if start.elapsed() > limit {
                return Err(Error::Config(format!(
                    "Command on '{}' not consumed after {} seconds. Is the suite running \
                     in step mode?",
                    channel.path().display(),
                    limit.as_secs()
                )));
            }
        }
        sleep(POLL).await;
    }
    Ok(())
}

/// Follow a report stream file, colorizing the contract lines
async fn tail(path: PathBuf, from_start: bool) -> Result<()> {
    let mut file = loop {
        match std::fs::File::open(&path) {
            Ok(file) => break file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => sleep(POLL).await,
            Err(e) => return Err(e.into()),
        }
    };

    let mut offset = if from_start {
        0
    } else {
        file.seek(SeekFrom::End(0))?
    };
    let mut carry = String::new();

    loop {
        file.seek(SeekFrom::Start(offset))?;
        let mut chunk = String::new();
        file.read_to_string(&mut chunk)?;
        offset += chunk.len() as u64;

        carry.push_str(&chunk);
        while let Some(newline) = carry.find('\n') {
            let line: String = carry.drain(..=newline).collect();
            print_report_line(line.trim_end_matches('\n'));
        }

        sleep(POLL).await;
    }
}

/// Colorize one report line by its contract prefix
fn print_report_line(line: &str) {
    let trimmed = line.trim_start();
    if trimmed.starts_with("Step failed: ") {
        println!("{}", line.red());
    } else if trimmed == "Step success" {
        println!("{}", line.green());
    } else if trimmed.starts_with("Feature: ") {
        println!("{}", line.blue().bold());
    } else if trimmed.starts_with("Scenario: ") {
        println!("{}", line.cyan());
    } else if trimmed.starts_with("Table row: ") || trimmed == "Outline table" {
        println!("{}", line.yellow());
    } else {
        println!("{line}");
    }
}
