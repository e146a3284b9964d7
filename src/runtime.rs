//! Per-case lifecycle driver.
//!
//! For every selected test method the runner performs, strictly in order:
//!
//! 1. **Reset** the per-method ledger state (messages, pending checks,
//!    expected exception). Counters persist.
//! 2. **Setup**, if the case defines one.
//! 3. **Execute** the body (skipped when setup raised), capturing at most
//!    one raised error and classifying it against the expected exception.
//! 4. **Teardown**, always.
//! 5. **Finalize**: an expectation still pending and every outstanding check
//!    count as one failure each.
//! 6. **Emit** the assertion failures recorded during the method.
//! 7. **Count** the method as attempted.
//!
//! Nothing a test does aborts the run: every failure is accumulated and the
//! next method starts with a clean slate.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::assertions::Assertions;
use crate::capture;
use crate::case::{MethodFilter, TestCase, TestMethod};
use crate::errors::HarnessResult;
use crate::ledger::Tally;
use crate::raised::{Outcome, Raised};
use crate::report::{Diagnostic, ReportSink};

/// How a single test method attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodOutcome {
    /// No failure of any kind.
    Passed,
    /// At least one failed assertion, unmet expectation or outstanding check.
    AssertionFailed,
    /// An error was raised and nothing expected it.
    ExceptionUnmatched,
    /// An error was raised and matched the declared expectation.
    ExceptionMatched,
}

impl MethodOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodOutcome::Passed => "passed",
            MethodOutcome::AssertionFailed => "assertion_failed",
            MethodOutcome::ExceptionUnmatched => "exception_unmatched",
            MethodOutcome::ExceptionMatched => "exception_matched",
        }
    }
}

impl fmt::Display for MethodOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one test method attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodRecord {
    pub name: &'static str,
    pub outcome: MethodOutcome,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of running one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub name: String,
    pub tally: Tally,
    pub methods: Vec<MethodRecord>,
}

impl CaseReport {
    pub fn method(&self, name: &str) -> Option<&MethodRecord> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// How the raised-error step of a method ended.
enum Classification {
    Clean,
    Matched,
    Unmatched,
}

/// Runs test cases one at a time under the fixed lifecycle.
#[derive(Debug, Clone)]
pub struct CaseRunner {
    filter: MethodFilter,
    capture_panics: bool,
}

impl Default for CaseRunner {
    fn default() -> Self {
        Self {
            filter: MethodFilter::default(),
            capture_panics: true,
        }
    }
}

impl CaseRunner {
    pub fn new(filter: MethodFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// When disabled, a panic in test code unwinds through the runner.
    pub fn capture_panics(mut self, capture: bool) -> Self {
        self.capture_panics = capture;
        self
    }

    pub fn filter(&self) -> &MethodFilter {
        &self.filter
    }

    /// Runs every selected method of `case` and reports to `sink`.
    ///
    /// Only sink write failures are returned as errors.
    pub fn run<T: TestCase>(&self, case: T, sink: &mut dyn ReportSink) -> HarnessResult<CaseReport> {
        self.run_as(T::name(), case, sink)
    }

    /// Like [`CaseRunner::run`], reporting the case under `name`.
    pub fn run_as<T: TestCase>(
        &self,
        name: &str,
        mut case: T,
        sink: &mut dyn ReportSink,
    ) -> HarnessResult<CaseReport> {
        debug!(case = name, "running test case");
        sink.begin_case(name)?;

        let methods = self.filter.select(T::methods());
        let mut t = Assertions::new();
        let mut records = Vec::with_capacity(methods.len());
        for method in methods {
            let record = self.run_method(name, &mut case, method, &mut t, sink)?;
            records.push(record);
        }

        let report = CaseReport {
            name: name.to_string(),
            tally: t.into_ledger().tally(),
            methods: records,
        };
        debug!(case = name, summary = %report.tally, "test case finished");
        sink.end_case(&report)?;
        Ok(report)
    }

    fn run_method<T: TestCase>(
        &self,
        case_name: &str,
        case: &mut T,
        method: TestMethod<T>,
        t: &mut Assertions,
        sink: &mut dyn ReportSink,
    ) -> HarnessResult<MethodRecord> {
        sink.begin_method(case_name, method.name)?;
        t.ledger_mut().reset_method_state();
        let failures_before = t.ledger().tally().fail_count;
        let mut diagnostics = Vec::new();

        let mut raised = self.attempt(|| case.setup(t)).err();
        if raised.is_none() {
            raised = self.attempt(|| (method.body)(case, t)).err();
        }
        let mut classification = match raised {
            Some(err) => self.classify(err, t, &mut diagnostics),
            None => Classification::Clean,
        };

        if let Err(err) = self.attempt(|| case.teardown(t)) {
            self.unmatched(err, t, &mut diagnostics);
            classification = Classification::Unmatched;
        }

        let ledger = t.ledger_mut();
        if let Some(expected) = ledger.take_expected_exception() {
            ledger.record_unlisted_failure();
            diagnostics.push(Diagnostic::ExpectationUnmet {
                message: expected.message,
                matcher: expected.matcher,
            });
        }
        for (token, message) in ledger.take_pending_checks() {
            ledger.record_unlisted_failure();
            diagnostics.push(Diagnostic::CheckOutstanding { token, message });
        }
        for record in ledger.take_messages() {
            diagnostics.push(Diagnostic::AssertionFailed {
                message: record.message,
                site: record.site,
            });
        }
        ledger.record_method_attempt();

        let failed = ledger.tally().fail_count > failures_before;
        let outcome = match classification {
            Classification::Unmatched => MethodOutcome::ExceptionUnmatched,
            _ if failed => MethodOutcome::AssertionFailed,
            Classification::Matched => MethodOutcome::ExceptionMatched,
            Classification::Clean => MethodOutcome::Passed,
        };
        debug!(case = case_name, method = method.name, %outcome, "test method finished");

        for diagnostic in &diagnostics {
            sink.diagnostic(diagnostic)?;
        }
        Ok(MethodRecord {
            name: method.name,
            outcome,
            diagnostics,
        })
    }

    /// Settles a raised error against the pending expectation. The expectation
    /// is consumed either way, so a mismatch is counted once, as an exception.
    fn classify(
        &self,
        err: Raised,
        t: &mut Assertions,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Classification {
        match t.ledger_mut().take_expected_exception() {
            Some(expected) if err.matches(&expected.matcher) => {
                debug!(matcher = %expected.matcher, kind = err.kind(), "expected exception raised");
                t.ledger_mut().record_pass();
                Classification::Matched
            }
            _ => {
                self.unmatched(err, t, diagnostics);
                Classification::Unmatched
            }
        }
    }

    fn unmatched(&self, err: Raised, t: &mut Assertions, diagnostics: &mut Vec<Diagnostic>) {
        t.ledger_mut().record_exception();
        diagnostics.push(Diagnostic::UnmatchedException {
            kind: err.kind().to_string(),
            message: err.message().to_string(),
            site: err.site().cloned(),
            trace: err.trace().map(str::to_string),
        });
    }

    /// Runs one piece of test code, turning a panic into a raised error.
    fn attempt(&self, f: impl FnOnce() -> Outcome) -> Outcome {
        if !self.capture_panics {
            return f();
        }
        capture::catching(f)
    }
}
