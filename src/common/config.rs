//! Configuration file handling

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::paths;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Command channel settings
    #[serde(default)]
    pub channel: ChannelConfig,

    /// Report stream settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Command channel settings
#[derive(Debug, Deserialize)]
pub struct ChannelConfig {
    /// Path to the command file, relative to the working directory
    #[serde(default = "default_channel_path")]
    pub path: PathBuf,

    /// Poll interval while waiting for a command, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            path: default_channel_path(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

fn default_channel_path() -> PathBuf {
    paths::channel_path()
}

fn default_poll_interval() -> u64 {
    100
}

impl ChannelConfig {
    /// Poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Report stream settings
#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    /// Spaces per nesting level. Zero reproduces a flat stream.
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// How to report outline rows with no matching step definition
    #[serde(default)]
    pub undefined_rows: UndefinedRowPolicy,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            undefined_rows: UndefinedRowPolicy::default(),
        }
    }
}

fn default_indent() -> usize {
    2
}

/// Policy for undefined outline table rows
///
/// Regular steps always report `Step failed: Step undefined`; table rows are
/// a policy point because downstream consumers disagree on whether a row
/// without a definition is a failure.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedRowPolicy {
    /// Say nothing for undefined rows
    #[default]
    Silent,
    /// Report undefined rows like undefined steps
    Report,
}

impl Config {
    /// Load configuration from `stepmode.toml`
    ///
    /// Checks the working directory, then the user config directory.
    /// Returns default configuration if neither file exists.
    pub fn load() -> Result<Self> {
        if let Some(path) = paths::config_path() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                super::Error::Config(format!("Failed to read '{}': {}", path.display(), e))
            })?;
            return toml::from_str(&content).map_err(|e| super::Error::ConfigParse(e.to_string()));
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.channel.path, PathBuf::from("step.txt"));
        assert_eq!(config.channel.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.report.indent, 2);
        assert_eq!(config.report.undefined_rows, UndefinedRowPolicy::Silent);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [channel]
            path = "commands/next.txt"

            [report]
            undefined_rows = "report"
            "#,
        )
        .unwrap();

        assert_eq!(config.channel.path, PathBuf::from("commands/next.txt"));
        // Unspecified fields keep their defaults
        assert_eq!(config.channel.poll_interval_ms, 100);
        assert_eq!(config.report.indent, 2);
        assert_eq!(config.report.undefined_rows, UndefinedRowPolicy::Report);
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.channel.poll_interval_ms, 100);
    }
}
