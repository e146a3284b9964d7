//! The assertion API handed to test method bodies.
//!
//! Every primitive is synchronous and writes into the case's [`Ledger`]
//! immediately. A failed assertion does not stop the method: it records the
//! message with the caller's location and execution continues with the next
//! statement.
//!
//! Every message argument is optional: pass `None` to record the default
//! message instead.
//!
//! All primitives are `#[track_caller]`, so the recorded [`CallSite`] is the
//! line in the test body rather than a line in this module.

use crate::ledger::{CallSite, Ledger};
use crate::value::Value;

/// Message recorded for a failed assertion given `None`.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Assertion failed";
/// Message reported for an unmet `assert_exception` given `None`.
pub const DEFAULT_EXPECTATION_MESSAGE: &str = "Expected exception";
/// Message reported for an outstanding `check` given `None`.
pub const DEFAULT_CHECK_MESSAGE: &str = "Expected check";

fn message_or<'m>(message: impl Into<Option<&'m str>>, default: &str) -> String {
    message.into().unwrap_or(default).to_string()
}

/// Handle through which a test method records assertions.
#[derive(Debug, Default)]
pub struct Assertions {
    ledger: Ledger,
}

impl Assertions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub(crate) fn into_ledger(self) -> Ledger {
        self.ledger
    }

    #[track_caller]
    fn record<'m>(&mut self, passed: bool, message: impl Into<Option<&'m str>>) {
        if passed {
            self.ledger.record_pass();
        } else {
            let message = message_or(message, DEFAULT_FAILURE_MESSAGE);
            self.ledger.record_failure(message, CallSite::caller());
        }
    }

    /// Passes only for the boolean `true`; truthy values of other types fail.
    #[track_caller]
    pub fn assert_true<'m>(
        &mut self,
        value: impl Into<Value>,
        message: impl Into<Option<&'m str>>,
    ) {
        let passed = value.into().as_bool() == Some(true);
        self.record(passed, message);
    }

    /// Passes only for the boolean `false`; falsy values of other types fail.
    #[track_caller]
    pub fn assert_false<'m>(
        &mut self,
        value: impl Into<Value>,
        message: impl Into<Option<&'m str>>,
    ) {
        let passed = value.into().as_bool() == Some(false);
        self.record(passed, message);
    }

    /// Coercive equality, see [`Value::loose_eq`].
    #[track_caller]
    pub fn assert_equal<'m>(
        &mut self,
        left: impl Into<Value>,
        right: impl Into<Value>,
        message: impl Into<Option<&'m str>>,
    ) {
        let passed = left.into().loose_eq(&right.into());
        self.record(passed, message);
    }

    /// Strict equality: same type and same value, see [`Value::identical`].
    #[track_caller]
    pub fn assert_identical<'m>(
        &mut self,
        left: impl Into<Value>,
        right: impl Into<Value>,
        message: impl Into<Option<&'m str>>,
    ) {
        let passed = left.into().identical(&right.into());
        self.record(passed, message);
    }

    /// Declares that the rest of the method must raise an error whose message
    /// contains `matcher` or whose kind is exactly `matcher`.
    ///
    /// Nothing is counted here. The declaration is settled when the method
    /// raises, or at finalize if it never does. A second declaration replaces
    /// the first.
    pub fn assert_exception<'m>(&mut self, matcher: &str, message: impl Into<Option<&'m str>>) {
        self.ledger.expect_exception(
            matcher.to_string(),
            message_or(message, DEFAULT_EXPECTATION_MESSAGE),
        );
    }

    /// Registers an obligation that must be cleared with [`Assertions::pass_check`]
    /// before the method ends.
    pub fn check<'m>(&mut self, token: &str, message: impl Into<Option<&'m str>>) {
        self.ledger
            .add_check(token.to_string(), message_or(message, DEFAULT_CHECK_MESSAGE));
    }

    /// Clears an obligation. Unknown or already cleared tokens are ignored.
    pub fn pass_check(&mut self, token: &str) {
        self.ledger.clear_check(token);
    }
}
