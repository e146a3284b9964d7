//! Outcome ledger: the per-case counters and the per-method scratch state
//! (failure messages, pending checks, the expected exception).
//!
//! The ledger is pure bookkeeping. The assertion API writes into it and the
//! runtime drains it at the end of every test method.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::ops::AddAssign;
use std::panic::Location;

/// Source location of an assertion call, a raised error or a panic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSite {
    pub file: Cow<'static, str>,
    pub line: u32,
    pub column: u32,
}

impl CallSite {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location of the nearest caller not marked `#[track_caller]`.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(loc: &'static Location<'static>) -> Self {
        Self::new(loc.file(), loc.line(), loc.column())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// The four outcome counters. Used both per case and, summed, per suite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub pass_count: usize,
    pub fail_count: usize,
    pub exception_count: usize,
    pub case_count: usize,
}

impl Tally {
    /// True when nothing failed and nothing was raised unexpectedly.
    pub fn is_clean(&self) -> bool {
        self.fail_count == 0 && self.exception_count == 0
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.pass_count += rhs.pass_count;
        self.fail_count += rhs.fail_count;
        self.exception_count += rhs.exception_count;
        self.case_count += rhs.case_count;
    }
}

impl std::iter::Sum for Tally {
    fn sum<I: Iterator<Item = Tally>>(iter: I) -> Self {
        iter.fold(Tally::default(), |mut acc, t| {
            acc += t;
            acc
        })
    }
}

// The numerator and denominator are both the attempted method count.
impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{cases}/{cases} tests complete. {fail} failed assertions. {pass} passed assertions. {exc} exceptions.",
            cases = self.case_count,
            fail = self.fail_count,
            pass = self.pass_count,
            exc = self.exception_count,
        )
    }
}

/// A failed assertion: the caller's message and where the assertion was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub message: String,
    pub site: CallSite,
}

/// An `assert_exception` declaration waiting for the method to raise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectedException {
    pub matcher: String,
    pub message: String,
}

/// Per-case outcome ledger.
#[derive(Debug, Default)]
pub struct Ledger {
    tally: Tally,
    messages: Vec<FailureRecord>,
    pending_checks: Vec<(String, String)>,
    expected_exception: Option<ExpectedException>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn messages(&self) -> &[FailureRecord] {
        &self.messages
    }

    /// Outstanding checks in registration order.
    pub fn pending_checks(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pending_checks
            .iter()
            .map(|(token, message)| (token.as_str(), message.as_str()))
    }

    pub fn expected_exception(&self) -> Option<&ExpectedException> {
        self.expected_exception.as_ref()
    }

    /// Clears the per-method scratch state. Counters are kept.
    pub fn reset_method_state(&mut self) {
        self.messages.clear();
        self.pending_checks.clear();
        self.expected_exception = None;
    }

    pub(crate) fn record_pass(&mut self) {
        self.tally.pass_count += 1;
    }

    pub(crate) fn record_failure(&mut self, message: String, site: CallSite) {
        self.messages.push(FailureRecord { message, site });
        self.tally.fail_count += 1;
    }

    /// Counts a failure that carries no assertion message (finalize-time failures).
    pub(crate) fn record_unlisted_failure(&mut self) {
        self.tally.fail_count += 1;
    }

    pub(crate) fn record_exception(&mut self) {
        self.tally.exception_count += 1;
    }

    pub(crate) fn record_method_attempt(&mut self) {
        self.tally.case_count += 1;
    }

    /// Registers a check. Re-registering a token replaces its message in place.
    pub(crate) fn add_check(&mut self, token: String, message: String) {
        match self.pending_checks.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = message,
            None => self.pending_checks.push((token, message)),
        }
    }

    pub(crate) fn clear_check(&mut self, token: &str) {
        self.pending_checks.retain(|(t, _)| t != token);
    }

    pub(crate) fn expect_exception(&mut self, matcher: String, message: String) {
        self.expected_exception = Some(ExpectedException { matcher, message });
    }

    pub(crate) fn take_expected_exception(&mut self) -> Option<ExpectedException> {
        self.expected_exception.take()
    }

    pub(crate) fn take_pending_checks(&mut self) -> Vec<(String, String)> {
        std::mem::take(&mut self.pending_checks)
    }

    pub(crate) fn take_messages(&mut self) -> Vec<FailureRecord> {
        std::mem::take(&mut self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_counters() {
        let mut ledger = Ledger::new();
        ledger.record_pass();
        ledger.record_failure("boom".into(), CallSite::caller());
        ledger.add_check("a".into(), "pending".into());
        ledger.expect_exception("Oops".into(), "expected".into());

        ledger.reset_method_state();

        assert!(ledger.messages().is_empty());
        assert_eq!(ledger.pending_checks().count(), 0);
        assert!(ledger.expected_exception().is_none());
        assert_eq!(ledger.tally().pass_count, 1);
        assert_eq!(ledger.tally().fail_count, 1);
    }

    #[test]
    fn re_registered_check_keeps_its_position() {
        let mut ledger = Ledger::new();
        ledger.add_check("a".into(), "first".into());
        ledger.add_check("b".into(), "second".into());
        ledger.add_check("a".into(), "replaced".into());
        let checks: Vec<_> = ledger.pending_checks().collect();
        assert_eq!(checks, vec![("a", "replaced"), ("b", "second")]);
    }

    #[test]
    fn tallies_sum_fieldwise() {
        let a = Tally {
            pass_count: 3,
            fail_count: 1,
            exception_count: 0,
            case_count: 2,
        };
        let b = Tally {
            pass_count: 2,
            fail_count: 0,
            exception_count: 1,
            case_count: 1,
        };
        let total: Tally = [a, b].into_iter().sum();
        assert_eq!(total.pass_count, 5);
        assert_eq!(total.fail_count, 1);
        assert_eq!(total.exception_count, 1);
        assert_eq!(total.case_count, 3);
    }

    #[test]
    fn summary_line_repeats_the_method_count() {
        let t = Tally {
            pass_count: 4,
            fail_count: 2,
            exception_count: 1,
            case_count: 3,
        };
        assert_eq!(
            t.to_string(),
            "3/3 tests complete. 2 failed assertions. 4 passed assertions. 1 exceptions."
        );
    }
}
