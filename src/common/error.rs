//! Error types for the step-mode layer
//!
//! Error messages double as user-visible report text in places (the
//! controller prints `Step failed: <error>` lines), so variants that carry a
//! runner message display it verbatim with no added prefix.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the step-mode layer
#[derive(Error, Debug)]
pub enum Error {
    // === Control Errors ===
    /// Deliberate abort via the STOP command. Fatal: nothing inside this
    /// crate catches it, so it propagates out of the step and terminates
    /// the suite.
    #[error("Stopped!")]
    Stopped,

    /// Failure surfaced by the runner while executing an injected step.
    /// Displays as the runner's own message so report lines stay clean.
    #[error("{0}")]
    StepFailed(String),

    /// The runner found no matching step definition for the given text
    #[error("Step undefined")]
    StepUndefined,

    // === Channel Errors ===
    #[error("Failed to read command file '{path}': {source}")]
    ChannelRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write command file '{path}': {source}")]
    ChannelWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // === Output Errors ===
    #[error("Failed to write report output: {0}")]
    Report(#[source] io::Error),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === Replay Script Errors ===
    #[error("Invalid replay script: {0}")]
    Script(String),

    #[error("Replay assertion failed: {0}")]
    ScriptAssertion(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a step failure from any displayable runner error
    pub fn step_failed<E: std::fmt::Display>(err: E) -> Self {
        Self::StepFailed(err.to_string())
    }

    /// Create a channel read error
    pub fn channel_read(path: &std::path::Path, source: io::Error) -> Self {
        Self::ChannelRead {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a channel write error
    pub fn channel_write(path: &std::path::Path, source: io::Error) -> Self {
        Self::ChannelWrite {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether this error aborts the whole suite (only STOP does)
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}
