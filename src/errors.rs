//! Harness errors.
//!
//! Only conditions that stop the harness itself live here. Anything a test
//! does (failed assertions, raised errors, outstanding checks) is recorded in
//! the ledger and never surfaces as a [`HarnessError`].

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Error, Diagnostic, Debug)]
pub enum HarnessError {
    /// A case factory failed; no ledger exists yet to record the failure in.
    #[error("failed to construct test case '{case}': {kind}: {message}")]
    #[diagnostic(
        code(casework::construction),
        help("constructors run before any test method, so their errors are not recoverable")
    )]
    Construction {
        case: String,
        kind: String,
        message: String,
    },

    #[error("no test case named '{name}' is registered")]
    #[diagnostic(code(casework::unknown_case))]
    UnknownCase {
        name: String,
        #[help]
        help: Option<String>,
    },

    #[error("failed to scan test directory '{}'", .path.display())]
    #[diagnostic(code(casework::discovery))]
    Discovery {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid {what} pattern '{pattern}'")]
    #[diagnostic(code(casework::pattern))]
    InvalidPattern {
        what: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to load configuration from '{}'", .path.display())]
    #[diagnostic(code(casework::config))]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigSource,
    },

    #[error("failed to write report")]
    #[diagnostic(code(casework::report))]
    Io(#[from] std::io::Error),
}

/// Underlying cause of a configuration failure.
#[derive(Error, Debug)]
pub enum ConfigSource {
    #[error(transparent)]
    Read(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] serde_yaml::Error),
}
