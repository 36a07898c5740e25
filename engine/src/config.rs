//! Per-call parse settings.
//!
//! # Example YAML
//!
//! ```yaml
//! options_first: true
//! help: true
//! version: "naval_fate 2.0"
//! exit: false
//! exit_full_usage: false
//! ```
//!
//! Missing keys take their defaults.

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings applied by [`UsageParser::parse`](crate::UsageParser::parse)
/// and [`docopt`](crate::docopt).
///
/// # Examples
///
/// ```
/// use docgram_engine::ParseOptions;
///
/// let options = ParseOptions::default()
///     .with_version("2.0")
///     .with_exit(false);
/// assert!(options.help);
/// assert_eq!(options.version.as_deref(), Some("2.0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Treat the first positional word and everything after it as
    /// positional.
    pub options_first: bool,
    /// Answer `-h` / `--help` with the usage section.
    pub help: bool,
    /// Answer `--version` with this string.
    pub version: Option<String>,
    /// Let [`docopt`](crate::docopt) terminate the process on failure or
    /// after help/version output.
    pub exit: bool,
    /// Show the full doc text instead of the usage section with help
    /// output and error messages.
    pub exit_full_usage: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            options_first: false,
            help: true,
            version: None,
            exit: true,
            exit_full_usage: false,
        }
    }
}

impl ParseOptions {
    pub fn with_options_first(mut self, options_first: bool) -> Self {
        self.options_first = options_first;
        self
    }

    pub fn with_help(mut self, help: bool) -> Self {
        self.help = help;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_exit(mut self, exit: bool) -> Self {
        self.exit = exit;
        self
    }

    pub fn with_exit_full_usage(mut self, exit_full_usage: bool) -> Self {
        self.exit_full_usage = exit_full_usage;
        self
    }

    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let options = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(options)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}
