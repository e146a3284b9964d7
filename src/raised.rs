//! Raised errors: what a test method hands back when it stops early.
//!
//! A test body returns [`Outcome`]. Returning `Err(Raised)` is the harness
//! equivalent of throwing: the rest of the method is skipped, teardown still
//! runs, and the runtime classifies the error against any pending
//! `assert_exception` declaration.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;

use crate::ledger::CallSite;

/// Result type of setup hooks, teardown hooks and test method bodies.
pub type Outcome = Result<(), Raised>;

/// Kind reported for a panic captured while running test code.
pub const PANIC_KIND: &str = "panic";

/// An error object raised out of test code.
#[derive(Clone, PartialEq, Eq)]
pub struct Raised {
    kind: String,
    qualified_kind: String,
    message: String,
    site: Option<CallSite>,
    trace: Option<String>,
}

impl Raised {
    /// Raises an error of the given kind from the caller's location.
    ///
    /// ```rust
    /// use casework::raised::Raised;
    /// let err = Raised::new("ValueError", "negative balance");
    /// assert_eq!(err.kind(), "ValueError");
    /// assert!(err.matches("balance"));
    /// assert!(err.matches("ValueError"));
    /// ```
    #[track_caller]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            qualified_kind: kind.clone(),
            kind,
            message: message.into(),
            site: Some(CallSite::caller()),
            trace: captured_trace(Backtrace::capture()),
        }
    }

    /// Builds a raised error from a caught panic payload. The panic location
    /// is not part of the payload; see [`Raised::with_origin`].
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self {
            kind: PANIC_KIND.to_string(),
            qualified_kind: PANIC_KIND.to_string(),
            message,
            site: None,
            trace: None,
        }
    }

    /// Attaches the location and backtrace recorded where a panic happened.
    pub(crate) fn with_origin(mut self, site: Option<CallSite>, trace: Option<String>) -> Self {
        self.site = site;
        self.trace = trace;
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Fully qualified kind; equal to [`Raised::kind`] for hand-raised errors.
    pub fn qualified_kind(&self) -> &str {
        &self.qualified_kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn site(&self) -> Option<&CallSite> {
        self.site.as_ref()
    }

    /// Rendered backtrace, present only when backtraces are enabled.
    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    /// True when `matcher` is a substring of the message or names the kind exactly.
    pub fn matches(&self, matcher: &str) -> bool {
        self.message.contains(matcher) || self.kind == matcher || self.qualified_kind == matcher
    }
}

impl fmt::Debug for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raised")
            .field("kind", &self.qualified_kind)
            .field("message", &self.message)
            .field("site", &self.site)
            .finish()
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Lets `?` raise any standard error from inside a test body.
impl<E> From<E> for Raised
where
    E: std::error::Error + 'static,
{
    #[track_caller]
    fn from(err: E) -> Self {
        let qualified = std::any::type_name::<E>();
        Self {
            kind: short_type_name(qualified).to_string(),
            qualified_kind: qualified.to_string(),
            message: err.to_string(),
            site: Some(CallSite::caller()),
            trace: captured_trace(Backtrace::capture()),
        }
    }
}

/// Text of a backtrace, or `None` when capture is disabled or unsupported.
pub(crate) fn captured_trace(backtrace: Backtrace) -> Option<String> {
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}

/// `core::num::error::ParseIntError` -> `ParseIntError`; generics are dropped.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Returns early from a test body with a [`Raised`] of the given kind.
///
/// ```rust
/// use casework::{raise, raised::Outcome};
/// fn withdraw(balance: i64, amount: i64) -> Outcome {
///     if amount > balance {
///         raise!(InsufficientFunds, "cannot withdraw {} from {}", amount, balance);
///     }
///     Ok(())
/// }
/// assert_eq!(withdraw(5, 10).unwrap_err().kind(), "InsufficientFunds");
/// ```
#[macro_export]
macro_rules! raise {
    ($kind:ident, $($arg:tt)+) => {
        return ::core::result::Result::Err($crate::raised::Raised::new(
            stringify!($kind),
            format!($($arg)+),
        ))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<i64, Raised> {
        Ok(input.parse::<i64>()?)
    }

    #[test]
    fn std_errors_convert_with_short_kind() {
        let err = parse("nope").unwrap_err();
        assert_eq!(err.kind(), "ParseIntError");
        assert!(err.qualified_kind().ends_with("::ParseIntError"));
        assert!(err.matches("ParseIntError"));
        assert!(err.matches(err.qualified_kind()));
        assert!(err.site().is_some());
    }

    #[test]
    fn short_type_name_strips_paths_and_generics() {
        assert_eq!(short_type_name("a::b::Thing"), "Thing");
        assert_eq!(short_type_name("a::Wrapper<b::Inner>"), "Wrapper");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn panic_payloads_become_messages() {
        let err = Raised::from_panic(Box::new("static message"));
        assert_eq!(err.kind(), PANIC_KIND);
        assert_eq!(err.message(), "static message");
        assert!(err.site().is_none());

        let err = Raised::from_panic(Box::new(String::from("owned")));
        assert_eq!(err.message(), "owned");
    }

    #[test]
    fn panic_origin_is_attached_afterwards() {
        let err = Raised::from_panic(Box::new("boom")).with_origin(
            Some(CallSite::new("src/lib.rs", 4, 2)),
            Some("   0: lib::boom".to_string()),
        );
        assert_eq!(err.site().map(ToString::to_string).as_deref(), Some("src/lib.rs:4"));
        assert_eq!(err.trace(), Some("   0: lib::boom"));
    }

    #[test]
    fn forced_backtraces_are_rendered() {
        assert!(captured_trace(Backtrace::force_capture()).is_some());
        assert_eq!(captured_trace(Backtrace::disabled()), None);
    }

    #[test]
    fn kind_match_is_exact_not_substring() {
        let err = Raised::new("ValueError", "bad input");
        assert!(!err.matches("Value"));
        assert!(err.matches("bad"));
        assert!(err.matches(""));
    }
}
