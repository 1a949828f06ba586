//! File-based command channel
//!
//! The channel is a single well-known file through which an external
//! controller hands commands to the running suite. The protocol is
//! deliberately the dumbest possible transport: plain text, first line only,
//! consumed exactly once by deleting the file after reading it. File absence
//! means "no command yet" and doubles as the consumption acknowledgement an
//! external writer polls for.
//!
//! There is exactly one reader and the protocol assumes one external writer
//! at a time; the read-then-delete sequence is the consume-once guarantee.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::{paths, Error, Result};

/// A command read from the channel file
///
/// `STOP`, `STEP` and `PLAY` are literal matches on the first line with
/// trailing line terminators stripped; anything else is ad-hoc step text to
/// execute in the running scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Abort the run
    Stop,
    /// Let exactly one step execute, then block again
    Step,
    /// Resume at full speed for the rest of the run
    Play,
    /// Execute this text as a step in the running scenario
    AdHoc(String),
}

impl Command {
    /// Parse one channel-file line, already stripped of line terminators
    pub fn parse(line: &str) -> Self {
        match line {
            "STOP" => Self::Stop,
            "STEP" => Self::Step,
            "PLAY" => Self::Play,
            other => Self::AdHoc(other.to_string()),
        }
    }
}

impl fmt::Display for Command {
    /// Wire form, as written into the channel file
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop => f.write_str("STOP"),
            Self::Step => f.write_str("STEP"),
            Self::Play => f.write_str("PLAY"),
            Self::AdHoc(text) => f.write_str(text),
        }
    }
}

/// The shared command file location
#[derive(Debug, Clone)]
pub struct CommandChannel {
    path: PathBuf,
}

impl Default for CommandChannel {
    fn default() -> Self {
        Self::new(paths::channel_path())
    }
}

impl CommandChannel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the channel file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a command is pending (file present, not yet consumed)
    ///
    /// External writers poll the negation of this after posting to learn
    /// that their command was consumed.
    pub fn pending(&self) -> bool {
        self.path.exists()
    }

    /// Consume the pending command, if any
    ///
    /// Absence of the file is the expected common case and returns
    /// `Ok(None)`. When the file is present, its first line is read with
    /// trailing CR/LF stripped, then the file is deleted unconditionally —
    /// regardless of command value — so a second reader never observes stale
    /// content. An empty file parses as ad-hoc empty text.
    pub fn try_consume(&self) -> Result<Option<Command>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::channel_read(&self.path, e)),
        };

        // Delete before parsing: consumption must happen no matter what the
        // file contained.
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::channel_read(&self.path, e)),
        }

        let line = content
            .lines()
            .next()
            .unwrap_or("")
            .trim_end_matches(['\r', '\n']);

        let command = Command::parse(line);
        debug!(path = %self.path.display(), ?command, "consumed command");
        Ok(Some(command))
    }

    /// Post a command for the reader to consume (writer side)
    ///
    /// Callers must not post a second command before the first is consumed;
    /// consumption is observable via [`pending`](Self::pending).
    pub fn post(&self, command: &Command) -> Result<()> {
        std::fs::write(&self.path, format!("{command}\n"))
            .map_err(|e| Error::channel_write(&self.path, e))?;
        debug!(path = %self.path.display(), %command, "posted command");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_channel() -> (tempfile::TempDir, CommandChannel) {
        let dir = tempfile::tempdir().unwrap();
        let channel = CommandChannel::new(dir.path().join("step.txt"));
        (dir, channel)
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(Command::parse("STOP"), Command::Stop);
        assert_eq!(Command::parse("STEP"), Command::Step);
        assert_eq!(Command::parse("PLAY"), Command::Play);
        assert_eq!(
            Command::parse("Given I press \"OK\""),
            Command::AdHoc("Given I press \"OK\"".to_string())
        );
        // Case matters: lowercase is ad-hoc step text
        assert_eq!(Command::parse("play"), Command::AdHoc("play".to_string()));
    }

    #[test]
    fn test_absent_file_is_no_command() {
        let (_dir, channel) = temp_channel();
        assert!(!channel.pending());
        assert_eq!(channel.try_consume().unwrap(), None);
    }

    #[test]
    fn test_consume_deletes_file() {
        let (_dir, channel) = temp_channel();
        channel.post(&Command::Step).unwrap();
        assert!(channel.pending());

        let command = channel.try_consume().unwrap();
        assert_eq!(command, Some(Command::Step));
        assert!(!channel.pending());
        // Nothing left to consume
        assert_eq!(channel.try_consume().unwrap(), None);
    }

    #[test]
    fn test_first_line_only_is_significant() {
        let (_dir, channel) = temp_channel();
        std::fs::write(channel.path(), "PLAY\nsecond line ignored\n").unwrap();
        assert_eq!(channel.try_consume().unwrap(), Some(Command::Play));
    }

    #[test]
    fn test_crlf_is_stripped() {
        let (_dir, channel) = temp_channel();
        std::fs::write(channel.path(), "STOP\r\n").unwrap();
        assert_eq!(channel.try_consume().unwrap(), Some(Command::Stop));
    }

    #[test]
    fn test_empty_file_is_empty_adhoc() {
        let (_dir, channel) = temp_channel();
        std::fs::write(channel.path(), "").unwrap();
        assert_eq!(
            channel.try_consume().unwrap(),
            Some(Command::AdHoc(String::new()))
        );
        assert!(!channel.pending());
    }

    #[test]
    fn test_adhoc_round_trip() {
        let (_dir, channel) = temp_channel();
        let cmd = Command::AdHoc("When I wait 2 seconds".to_string());
        channel.post(&cmd).unwrap();
        assert_eq!(channel.try_consume().unwrap(), Some(cmd));
    }
}
