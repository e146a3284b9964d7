//! Suite aggregation: run one case, every registered case, or every case
//! registered by the test files found in a directory.
//!
//! Cases are collected explicitly in a [`CaseRegistry`]; the aggregator
//! never looks for types on its own. Whether a run is part of a larger
//! sweep is carried in a [`RunContext`] value rather than global state.

use std::any::TypeId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::case::TestCase;
use crate::config::HarnessConfig;
use crate::discovery::{self, FilePattern, PluginCatalog, DEFAULT_FILE_PATTERN};
use crate::errors::{HarnessError, HarnessResult};
use crate::ledger::Tally;
use crate::raised::Raised;
use crate::report::ReportSink;
use crate::runtime::{CaseReport, CaseRunner};

type Launch = Box<dyn Fn(&CaseRunner, &mut dyn ReportSink) -> HarnessResult<CaseReport>>;

struct Entry {
    type_id: TypeId,
    launch: Launch,
}

/// Known test cases, keyed and ordered by case name.
///
/// Each case type is registered at most once. Two distinct types reporting
/// the same [`TestCase::name`] are both kept; the later one is listed under
/// its full type path.
#[derive(Default)]
pub struct CaseRegistry {
    entries: BTreeMap<String, Entry>,
}

impl CaseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a case constructed with `Default`.
    pub fn register<T: TestCase + Default>(&mut self) -> &mut Self {
        self.register_with::<T, _>(|| Ok(T::default()))
    }

    /// Registers a case with a fallible constructor. The constructor runs once
    /// per run of the case; an error from it aborts the run it is part of.
    ///
    /// A case type that is already registered keeps its first registration.
    pub fn register_with<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: TestCase,
        F: Fn() -> Result<T, Raised> + 'static,
    {
        let type_id = TypeId::of::<T>();
        if self.entries.values().any(|entry| entry.type_id == type_id) {
            debug!(case = T::name(), "test case already registered");
            return self;
        }
        let mut name = T::name().to_string();
        if self.entries.contains_key(&name) {
            let full = std::any::type_name::<T>();
            warn!(case = name.as_str(), listed_as = full, "test case name already taken");
            name = full.to_string();
        }
        let case_name = name.clone();
        let launch: Launch = Box::new(move |runner: &CaseRunner, sink: &mut dyn ReportSink| {
            let case = factory().map_err(|err| HarnessError::Construction {
                case: case_name.clone(),
                kind: err.kind().to_string(),
                message: err.message().to_string(),
            })?;
            runner.run_as(&case_name, case, sink)
        });
        self.entries.insert(name, Entry { type_id, launch });
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CaseRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Whether a run is part of an aggregate sweep.
///
/// Inside an aggregate sweep, [`Suite::run_one`] does nothing, so a case that
/// is also wired up to run on its own is not reported twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunContext {
    aggregate: bool,
}

impl RunContext {
    pub fn standalone() -> Self {
        Self { aggregate: false }
    }

    pub fn aggregate() -> Self {
        Self { aggregate: true }
    }

    pub fn is_aggregate(&self) -> bool {
        self.aggregate
    }

    fn enter_aggregate(&mut self) {
        self.aggregate = true;
    }
}

/// Field-wise sum of every case run together, plus the per-case reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
    pub tally: Tally,
}

impl SuiteReport {
    pub fn case(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|c| c.name == name)
    }
}

/// The aggregator.
pub struct Suite {
    registry: CaseRegistry,
    runner: CaseRunner,
    file_pattern: FilePattern,
    test_dir: PathBuf,
}

impl Suite {
    pub fn new(registry: CaseRegistry) -> Self {
        Self {
            registry,
            runner: CaseRunner::default(),
            file_pattern: default_file_pattern(),
            test_dir: PathBuf::from("tests"),
        }
    }

    pub fn from_config(registry: CaseRegistry, config: &HarnessConfig) -> HarnessResult<Self> {
        Ok(Self {
            registry,
            runner: config.runner()?,
            file_pattern: config.file_pattern()?,
            test_dir: config.test_dir.clone(),
        })
    }

    pub fn with_runner(mut self, runner: CaseRunner) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_file_pattern(mut self, pattern: FilePattern) -> Self {
        self.file_pattern = pattern;
        self
    }

    pub fn with_test_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.test_dir = dir.into();
        self
    }

    pub fn registry(&self) -> &CaseRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CaseRegistry {
        &mut self.registry
    }

    /// Runs the named case on its own and renders its report.
    ///
    /// Returns `Ok(None)` without running anything when `ctx` is aggregate.
    pub fn run_one(
        &self,
        ctx: &RunContext,
        name: &str,
        sink: &mut dyn ReportSink,
    ) -> HarnessResult<Option<CaseReport>> {
        if ctx.is_aggregate() {
            debug!(case = name, "aggregate run in progress; single run suppressed");
            return Ok(None);
        }
        let entry = self
            .registry
            .entries
            .get(name)
            .ok_or_else(|| self.unknown_case(name))?;
        sink.begin_run()?;
        let report = (entry.launch)(&self.runner, &mut *sink)?;
        sink.end_run(None)?;
        Ok(Some(report))
    }

    /// Runs every registered case in name order and renders the aggregate
    /// summary after the last per-case report.
    pub fn run_all(
        &self,
        ctx: &mut RunContext,
        sink: &mut dyn ReportSink,
    ) -> HarnessResult<SuiteReport> {
        ctx.enter_aggregate();
        sink.begin_run()?;
        let mut suite = SuiteReport::default();
        for (name, entry) in &self.registry.entries {
            debug!(case = name.as_str(), "aggregate run: next case");
            let report = (entry.launch)(&self.runner, &mut *sink)?;
            suite.tally += report.tally;
            suite.cases.push(report);
        }
        sink.end_run(Some(&suite.tally))?;
        Ok(suite)
    }

    /// Registers the cases of every test file in `dir` (default: the
    /// configured test directory), then runs all registered cases.
    ///
    /// Test files are matched by the file pattern and resolved to
    /// registration functions through `catalog` by file stem.
    pub fn run_dir(
        &mut self,
        ctx: &mut RunContext,
        dir: Option<&Path>,
        catalog: &PluginCatalog,
        sink: &mut dyn ReportSink,
    ) -> HarnessResult<SuiteReport> {
        ctx.enter_aggregate();
        let dir = dir.map_or_else(|| self.test_dir.clone(), Path::to_path_buf);
        let files = discovery::scan_test_files(&dir, &self.file_pattern)?;
        debug!(dir = %dir.display(), files = files.len(), "test files found");
        for file in &files {
            match catalog.for_file(file) {
                Some(register) => register(&mut self.registry),
                None => warn!(
                    file = %file.display(),
                    "test file has no registration function; skipped"
                ),
            }
        }
        self.run_all(ctx, sink)
    }

    fn unknown_case(&self, name: &str) -> HarnessError {
        let known: Vec<&str> = self.registry.names().collect();
        let help = if known.is_empty() {
            None
        } else {
            Some(format!("registered cases: {}", known.join(", ")))
        };
        HarnessError::UnknownCase {
            name: name.to_string(),
            help,
        }
    }
}

fn default_file_pattern() -> FilePattern {
    FilePattern::new(DEFAULT_FILE_PATTERN).expect("default file pattern is a valid glob")
}
