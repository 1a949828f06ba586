//! Channel and configuration path resolution
//!
//! The command channel lives at a fixed, well-known path relative to the
//! process working directory so an external controller can find it without
//! negotiation. Configuration follows the usual per-project-then-per-user
//! lookup.

use std::path::PathBuf;

/// Well-known name of the command channel file, agreed out-of-band with the
/// external controller.
pub const CHANNEL_FILE: &str = "step.txt";

/// Name of the per-project configuration file
pub const CONFIG_FILE: &str = "stepmode.toml";

/// Default channel path: `step.txt` in the current working directory
pub fn channel_path() -> PathBuf {
    PathBuf::from(CHANNEL_FILE)
}

/// Get the user configuration directory
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/stepmode/`
/// - macOS: `~/Library/Application Support/stepmode/`
/// - Windows: `%APPDATA%\stepmode\`
pub fn user_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "stepmode")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Locate the configuration file, if any
///
/// Checks the working directory first (per-project config), then the user
/// config directory. Returns `None` when neither exists; callers fall back
/// to defaults.
pub fn config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    user_config_dir()
        .map(|dir| dir.join(CONFIG_FILE))
        .filter(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_path_is_relative() {
        assert!(channel_path().is_relative());
        assert_eq!(channel_path().to_str(), Some("step.txt"));
    }

    #[test]
    fn test_user_config_dir_is_valid() {
        let dir = user_config_dir();
        assert!(dir.is_some());
    }
}
