//! Test case declaration.
//!
//! A test case is any type implementing [`TestCase`]. It lists its methods
//! explicitly through [`TestCase::methods`] (usually with the [`methods!`]
//! macro); the runtime then keeps the ones whose names match the configured
//! [`MethodFilter`], in declaration order.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::assertions::Assertions;
use crate::errors::{HarnessError, HarnessResult};
use crate::raised::Outcome;

/// Signature of a test method body.
pub type MethodBody<T> = fn(&mut T, &mut Assertions) -> Outcome;

/// A named method on a test case.
pub struct TestMethod<T> {
    pub name: &'static str,
    pub body: MethodBody<T>,
}

impl<T> TestMethod<T> {
    pub fn new(name: &'static str, body: MethodBody<T>) -> Self {
        Self { name, body }
    }
}

impl<T> Clone for TestMethod<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TestMethod<T> {}

impl<T> std::fmt::Debug for TestMethod<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TestMethod").field(&self.name).finish()
    }
}

/// A grouping of test methods that share setup and teardown.
///
/// `setup` and `teardown` default to doing nothing, which is the same as the
/// hook being absent.
pub trait TestCase: Sized + 'static {
    /// Name used for reporting, registry lookup and aggregate ordering.
    fn name() -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Every candidate method, in declaration order. Names that do not match
    /// the method filter (helpers, for instance) are skipped by the runtime.
    fn methods() -> Vec<TestMethod<Self>>;

    /// Runs before every test method.
    fn setup(&mut self, _t: &mut Assertions) -> Outcome {
        Ok(())
    }

    /// Runs after every test method, whatever the method did.
    fn teardown(&mut self, _t: &mut Assertions) -> Outcome {
        Ok(())
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Lists methods of a test case with their names taken from the identifiers.
///
/// ```rust
/// use casework::{methods, Assertions, Outcome, TestCase, TestMethod};
///
/// #[derive(Default)]
/// struct Arithmetic;
///
/// impl Arithmetic {
///     fn test_addition(&mut self, t: &mut Assertions) -> Outcome {
///         t.assert_equal(2 + 2, 4, "addition");
///         Ok(())
///     }
/// }
///
/// impl TestCase for Arithmetic {
///     fn methods() -> Vec<TestMethod<Self>> {
///         methods![Self => test_addition]
///     }
/// }
///
/// assert_eq!(Arithmetic::methods()[0].name, "test_addition");
/// assert_eq!(Arithmetic::name(), "Arithmetic");
/// ```
#[macro_export]
macro_rules! methods {
    ($owner:ty => $($name:ident),* $(,)?) => {
        vec![$($crate::case::TestMethod::new(stringify!($name), <$owner>::$name)),*]
    };
}

/// Default naming convention for test methods.
pub const DEFAULT_METHOD_PATTERN: &str = "^test_";

static DEFAULT_FILTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_METHOD_PATTERN).expect("default method pattern is a valid regex")
});

/// Decides which method names are test methods.
#[derive(Debug, Clone)]
pub struct MethodFilter {
    pattern: Regex,
}

impl MethodFilter {
    pub fn new(pattern: &str) -> HarnessResult<Self> {
        let pattern = Regex::new(pattern).map_err(|source| HarnessError::InvalidPattern {
            what: "method",
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    pub fn is_test_method(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    /// Matching methods in declaration order, first occurrence of a name wins.
    pub fn select<T>(&self, methods: Vec<TestMethod<T>>) -> Vec<TestMethod<T>> {
        let mut seen = Vec::new();
        methods
            .into_iter()
            .filter(|m| self.is_test_method(m.name))
            .filter(|m| {
                if seen.contains(&m.name) {
                    false
                } else {
                    seen.push(m.name);
                    true
                }
            })
            .collect()
    }
}

impl Default for MethodFilter {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_FILTER.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample;

    impl Sample {
        fn test_one(&mut self, _t: &mut Assertions) -> Outcome {
            Ok(())
        }
        fn helper(&mut self, _t: &mut Assertions) -> Outcome {
            Ok(())
        }
        fn check_two(&mut self, _t: &mut Assertions) -> Outcome {
            Ok(())
        }
    }

    impl TestCase for Sample {
        fn methods() -> Vec<TestMethod<Self>> {
            crate::methods![Self => test_one, helper, check_two, test_one]
        }
    }

    fn names<T>(methods: &[TestMethod<T>]) -> Vec<&'static str> {
        methods.iter().map(|m| m.name).collect()
    }

    #[test]
    fn default_filter_keeps_test_prefix_once() {
        let selected = MethodFilter::default().select(Sample::methods());
        assert_eq!(names(&selected), vec!["test_one"]);
    }

    #[test]
    fn custom_pattern_changes_the_convention() {
        let filter = MethodFilter::new("^check_").unwrap();
        let selected = filter.select(Sample::methods());
        assert_eq!(names(&selected), vec!["check_two"]);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = MethodFilter::new("(unclosed").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidPattern { what: "method", .. }));
    }

    #[test]
    fn default_name_is_the_short_type_name() {
        assert_eq!(Sample::name(), "Sample");
    }
}
