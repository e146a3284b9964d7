//! Report sinks.
//!
//! The runtime pushes an ordered stream of events into a [`ReportSink`]:
//! case and method boundaries, one [`Diagnostic`] per non-fatal failure,
//! per-case summaries and, for aggregate runs, one suite summary. How that
//! stream is rendered is up to the sink.

use std::fmt;
use std::io;

use serde::Serialize;

use crate::ledger::{CallSite, Tally};
use crate::runtime::CaseReport;

pub mod buffer;
pub mod json;
pub mod text;

pub use buffer::BufferSink;
pub use json::JsonSink;
pub use text::TextSink;

/// One non-fatal failure, as reported to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "diagnostic", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An assertion call that did not hold.
    AssertionFailed { message: String, site: CallSite },
    /// A raised error that no `assert_exception` declaration matched.
    ///
    /// `trace` is the backtrace taken where the error was raised, present
    /// only when backtraces are enabled (`RUST_BACKTRACE`/`RUST_LIB_BACKTRACE`).
    UnmatchedException {
        kind: String,
        message: String,
        site: Option<CallSite>,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace: Option<String>,
    },
    /// An `assert_exception` declaration the method never satisfied.
    ExpectationUnmet { message: String, matcher: String },
    /// A `check` token that was never passed.
    CheckOutstanding { token: String, message: String },
}

impl Diagnostic {
    /// Leading label: `Fail` or `Exception <kind>`.
    pub fn label(&self) -> String {
        match self {
            Diagnostic::UnmatchedException { kind, .. } => format!("Exception {}", kind),
            _ => "Fail".to_string(),
        }
    }

    /// Backtrace rendered under an unmatched exception, when one was captured.
    pub fn trace(&self) -> Option<&str> {
        match self {
            Diagnostic::UnmatchedException { trace, .. } => trace.as_deref(),
            _ => None,
        }
    }

    /// Everything after the label.
    pub fn detail(&self) -> String {
        match self {
            Diagnostic::AssertionFailed { message, site } => format!("{} / {}", message, site),
            Diagnostic::UnmatchedException { message, site, .. } => match site {
                Some(site) => format!("{} / {}", message, site),
                None => format!("{} / <unknown>", message),
            },
            Diagnostic::ExpectationUnmet { message, matcher } => {
                format!("{} / {}", message, matcher)
            }
            Diagnostic::CheckOutstanding { message, .. } => message.clone(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.detail())
    }
}

/// Ordered, append-only consumer of run events.
pub trait ReportSink {
    /// Start of a run (one case or a whole suite).
    fn begin_run(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn begin_case(&mut self, case: &str) -> io::Result<()>;

    fn begin_method(&mut self, case: &str, method: &str) -> io::Result<()>;

    fn diagnostic(&mut self, diagnostic: &Diagnostic) -> io::Result<()>;

    /// Per-case summary, emitted after the last method of the case.
    fn end_case(&mut self, report: &CaseReport) -> io::Result<()>;

    /// End of a run. `aggregate` is set only for multi-case runs.
    fn end_run(&mut self, _aggregate: Option<&Tally>) -> io::Result<()> {
        Ok(())
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn begin_run(&mut self) -> io::Result<()> {
        (**self).begin_run()
    }

    fn begin_case(&mut self, case: &str) -> io::Result<()> {
        (**self).begin_case(case)
    }

    fn begin_method(&mut self, case: &str, method: &str) -> io::Result<()> {
        (**self).begin_method(case, method)
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        (**self).diagnostic(diagnostic)
    }

    fn end_case(&mut self, report: &CaseReport) -> io::Result<()> {
        (**self).end_case(report)
    }

    fn end_run(&mut self, aggregate: Option<&Tally>) -> io::Result<()> {
        (**self).end_run(aggregate)
    }
}

impl<S: ReportSink + ?Sized> ReportSink for Box<S> {
    fn begin_run(&mut self) -> io::Result<()> {
        (**self).begin_run()
    }

    fn begin_case(&mut self, case: &str) -> io::Result<()> {
        (**self).begin_case(case)
    }

    fn begin_method(&mut self, case: &str, method: &str) -> io::Result<()> {
        (**self).begin_method(case, method)
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        (**self).diagnostic(diagnostic)
    }

    fn end_case(&mut self, report: &CaseReport) -> io::Result<()> {
        (**self).end_case(report)
    }

    fn end_run(&mut self, aggregate: Option<&Tally>) -> io::Result<()> {
        (**self).end_run(aggregate)
    }
}
