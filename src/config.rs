//! Harness configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the conventional setup: methods named `test_*`, files named
//! `test_*.rs` under `tests/`, colored text output when stdout is a terminal.
//!
//! ```yaml
//! method_pattern: "^(test|check)_"
//! file_pattern: "test_*.rs"
//! test_dir: tests/cases
//! color: never
//! format: json
//! capture_panics: true
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use termcolor::ColorChoice;

use crate::case::{MethodFilter, DEFAULT_METHOD_PATTERN};
use crate::discovery::{FilePattern, DEFAULT_FILE_PATTERN};
use crate::errors::{ConfigSource, HarnessError, HarnessResult};
use crate::report::{JsonSink, ReportSink, TextSink};
use crate::runtime::CaseRunner;

/// When to color text output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolves `Auto` against whether stdout is a terminal.
    pub fn choice(&self) -> ColorChoice {
        match self {
            ColorMode::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
            ColorMode::Auto => ColorChoice::Never,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Regex a method name must match to be run as a test method.
    pub method_pattern: String,
    /// Glob a file name must match to be loaded in directory mode.
    pub file_pattern: String,
    /// Directory scanned by directory mode when none is given.
    pub test_dir: PathBuf,
    pub color: ColorMode,
    pub format: OutputFormat,
    /// Treat panics in test code as raised errors instead of unwinding.
    pub capture_panics: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            method_pattern: DEFAULT_METHOD_PATTERN.to_string(),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            test_dir: PathBuf::from("tests"),
            color: ColorMode::default(),
            format: OutputFormat::default(),
            capture_panics: true,
        }
    }
}

impl HarnessConfig {
    /// Reads a YAML configuration file.
    pub fn load(path: &Path) -> HarnessResult<Self> {
        let fail = |source: ConfigSource| HarnessError::Config {
            path: path.to_path_buf(),
            source,
        };
        let text = fs::read_to_string(path).map_err(|e| fail(e.into()))?;
        Self::from_yaml_str(&text).map_err(|e| fail(e.into()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn method_filter(&self) -> HarnessResult<MethodFilter> {
        MethodFilter::new(&self.method_pattern)
    }

    pub fn file_pattern(&self) -> HarnessResult<FilePattern> {
        FilePattern::new(&self.file_pattern)
    }

    pub fn runner(&self) -> HarnessResult<CaseRunner> {
        Ok(CaseRunner::new(self.method_filter()?).capture_panics(self.capture_panics))
    }

    /// Report sink on stdout in the configured format.
    pub fn stdout_sink(&self) -> Box<dyn ReportSink> {
        match self.format {
            OutputFormat::Text => Box::new(TextSink::stdout(self.color.choice())),
            OutputFormat::Json => Box::new(JsonSink::new(io::stdout())),
        }
    }
}
