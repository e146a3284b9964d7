//! Command-line arguments for harness binaries.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{ColorMode, HarnessConfig, OutputFormat};
use crate::errors::HarnessResult;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "casework",
    version,
    about = "Run registered test cases and report every assertion outcome."
)]
pub struct HarnessArgs {
    /// Run only the named test case.
    #[arg(long, value_name = "NAME", conflicts_with = "dir")]
    pub case: Option<String>,

    /// Register the test files found in a directory, then run every case.
    /// Without a value the configured test directory is scanned.
    #[arg(long, value_name = "PATH")]
    pub dir: Option<Option<PathBuf>>,

    /// YAML configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// When to color text output.
    #[arg(long, value_enum)]
    pub color: Option<ColorMode>,

    /// Regex a method name must match to be run as a test method.
    #[arg(long, value_name = "REGEX")]
    pub method_pattern: Option<String>,

    /// Let panics in test code unwind instead of counting them as exceptions.
    #[arg(long)]
    pub no_capture: bool,
}

/// Which aggregator entry point a command line selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    One(String),
    Directory(Option<PathBuf>),
    All,
}

impl HarnessArgs {
    pub fn mode(&self) -> RunMode {
        match (&self.case, &self.dir) {
            (Some(name), _) => RunMode::One(name.clone()),
            (None, Some(dir)) => RunMode::Directory(dir.clone()),
            (None, None) => RunMode::All,
        }
    }

    /// Configuration file (or `defaults`) with command-line overrides applied.
    pub fn resolve_config(&self, defaults: HarnessConfig) -> HarnessResult<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None => defaults,
        };
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(color) = self.color {
            config.color = color;
        }
        if let Some(pattern) = &self.method_pattern {
            config.method_pattern = pattern.clone();
        }
        if self.no_capture {
            config.capture_panics = false;
        }
        Ok(config)
    }
}
