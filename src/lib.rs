//! Casework: an xUnit-style test harness.
//!
//! Test cases implement [`TestCase`] and list their methods; the
//! [`CaseRunner`] drives every `test_*` method through setup, body and
//! teardown while the [`Assertions`] handle records passes, failures,
//! pending checks and expected exceptions into the case's ledger. A
//! [`Suite`] runs one case, every registered case, or every case registered
//! by the test files found in a directory, and sums the ledgers into a
//! [`SuiteReport`].

pub mod assertions;
mod capture;
pub mod case;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod ledger;
pub mod raised;
pub mod report;
pub mod runtime;
pub mod suite;
pub mod value;

pub use crate::assertions::Assertions;
pub use crate::case::{MethodFilter, TestCase, TestMethod};
pub use crate::config::HarnessConfig;
pub use crate::discovery::{FilePattern, PluginCatalog};
pub use crate::errors::{HarnessError, HarnessResult};
pub use crate::ledger::Tally;
pub use crate::raised::{Outcome, Raised};
pub use crate::runtime::{CaseReport, CaseRunner, MethodOutcome};
pub use crate::suite::{CaseRegistry, RunContext, Suite, SuiteReport};
pub use crate::value::Value;

/// Everything a test file needs.
pub mod prelude {
    pub use crate::assertions::Assertions;
    pub use crate::case::{TestCase, TestMethod};
    pub use crate::raised::{Outcome, Raised};
    pub use crate::suite::CaseRegistry;
    pub use crate::value::Value;
    pub use crate::{methods, raise};
}
