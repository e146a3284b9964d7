// Aggregation across registered cases.

use casework::prelude::*;
use casework::report::BufferSink;
use casework::{HarnessError, RunContext, Suite};

/// Three passes and one failure.
#[derive(Default)]
struct Alpha;

impl Alpha {
    fn test_mixed(&mut self, t: &mut Assertions) -> Outcome {
        t.assert_true(true, "one");
        t.assert_equal(2, "2", "two");
        t.assert_identical("x", "x", "three");
        t.assert_false(true, "four");
        Ok(())
    }
}

impl TestCase for Alpha {
    fn methods() -> Vec<TestMethod<Self>> {
        methods![Self => test_mixed]
    }
}

/// Two passes and no failures.
#[derive(Default)]
struct Beta;

impl Beta {
    fn test_one(&mut self, t: &mut Assertions) -> Outcome {
        t.assert_true(true, "one");
        Ok(())
    }

    fn test_two(&mut self, t: &mut Assertions) -> Outcome {
        t.assert_equal(1.0, 1, "two");
        Ok(())
    }
}

impl TestCase for Beta {
    fn methods() -> Vec<TestMethod<Self>> {
        methods![Self => test_one, test_two]
    }
}

struct Unbuildable;

impl TestCase for Unbuildable {
    fn methods() -> Vec<TestMethod<Self>> {
        Vec::new()
    }
}

fn suite() -> Suite {
    let mut registry = CaseRegistry::new();
    // registration order is deliberately not name order
    registry.register::<Beta>().register::<Alpha>();
    Suite::new(registry)
}

#[test]
fn run_all_sums_every_case() {
    let mut ctx = RunContext::standalone();
    let mut sink = BufferSink::new();
    let report = suite().run_all(&mut ctx, &mut sink).unwrap();

    assert_eq!(report.tally.pass_count, 5);
    assert_eq!(report.tally.fail_count, 1);
    assert_eq!(report.tally.exception_count, 0);
    assert_eq!(report.tally.case_count, 3);
    assert_eq!(report.case("Alpha").unwrap().tally.pass_count, 3);
    assert_eq!(report.case("Beta").unwrap().tally.pass_count, 2);
}

#[test]
fn run_all_goes_in_name_order_and_summarises_last() {
    let mut ctx = RunContext::standalone();
    let mut sink = BufferSink::new();
    suite().run_all(&mut ctx, &mut sink).unwrap();

    let headers: Vec<&str> = sink
        .lines()
        .iter()
        .filter(|l| l.starts_with("# "))
        .map(String::as_str)
        .collect();
    assert_eq!(headers, vec!["# Alpha", "# Beta"]);
    assert_eq!(
        sink.lines().last().map(String::as_str),
        Some("ALL: 3/3 tests complete. 1 failed assertions. 5 passed assertions. 0 exceptions.")
    );
}

#[test]
fn run_all_marks_the_context_aggregate() {
    let mut ctx = RunContext::standalone();
    assert!(!ctx.is_aggregate());
    suite().run_all(&mut ctx, &mut BufferSink::new()).unwrap();
    assert!(ctx.is_aggregate());
}

#[test]
fn run_one_reports_a_single_case() {
    let mut sink = BufferSink::new();
    let report = suite()
        .run_one(&RunContext::standalone(), "Beta", &mut sink)
        .unwrap()
        .unwrap();
    assert_eq!(report.tally.case_count, 2);
    assert_eq!(
        sink.lines().last().map(String::as_str),
        Some("2/2 tests complete. 0 failed assertions. 2 passed assertions. 0 exceptions.")
    );
    assert!(!sink.as_text().contains("ALL:"));
}

#[test]
fn run_one_is_suppressed_inside_an_aggregate_run() {
    let mut sink = BufferSink::new();
    let report = suite()
        .run_one(&RunContext::aggregate(), "Beta", &mut sink)
        .unwrap();
    assert!(report.is_none());
    assert!(sink.lines().is_empty());
}

#[test]
fn run_one_rejects_unknown_names() {
    let err = suite()
        .run_one(&RunContext::standalone(), "Gamma", &mut BufferSink::new())
        .unwrap_err();
    match err {
        HarnessError::UnknownCase { name, help } => {
            assert_eq!(name, "Gamma");
            assert_eq!(help.as_deref(), Some("registered cases: Alpha, Beta"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn duplicate_registration_keeps_one_entry() {
    let mut registry = CaseRegistry::new();
    registry.register::<Alpha>().register::<Alpha>().register::<Beta>();
    assert_eq!(registry.len(), 2);

    let report = Suite::new(registry)
        .run_all(&mut RunContext::standalone(), &mut BufferSink::new())
        .unwrap();
    assert_eq!(report.cases.len(), 2);
    assert_eq!(report.tally.pass_count, 5);
}

#[test]
fn construction_failure_aborts_the_run() {
    let mut registry = CaseRegistry::new();
    registry
        .register::<Alpha>()
        .register_with(|| -> Result<Unbuildable, Raised> {
            Err(Raised::new("MissingFixture", "database unavailable"))
        });
    let err = Suite::new(registry)
        .run_all(&mut RunContext::standalone(), &mut BufferSink::new())
        .unwrap_err();
    match err {
        HarnessError::Construction {
            case,
            kind,
            message,
        } => {
            assert_eq!(case, "Unbuildable");
            assert_eq!(kind, "MissingFixture");
            assert_eq!(message, "database unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_registry_runs_to_an_empty_summary() {
    let mut sink = BufferSink::new();
    let report = Suite::new(CaseRegistry::new())
        .run_all(&mut RunContext::standalone(), &mut sink)
        .unwrap();
    assert!(report.tally.is_clean());
    assert_eq!(
        sink.lines(),
        ["ALL: 0/0 tests complete. 0 failed assertions. 0 passed assertions. 0 exceptions."]
    );
}

mod posts {
    use casework::prelude::*;

    #[derive(Default)]
    pub struct Basic;

    impl Basic {
        fn test_publishes(&mut self, t: &mut Assertions) -> Outcome {
            t.assert_true(true, "post published");
            Ok(())
        }
    }

    impl TestCase for Basic {
        fn methods() -> Vec<TestMethod<Self>> {
            methods![Self => test_publishes]
        }
    }
}

mod users {
    use casework::prelude::*;

    #[derive(Default)]
    pub struct Basic;

    impl Basic {
        fn test_signs_up(&mut self, t: &mut Assertions) -> Outcome {
            t.assert_true(false, "user signed up");
            Ok(())
        }
    }

    impl TestCase for Basic {
        fn methods() -> Vec<TestMethod<Self>> {
            methods![Self => test_signs_up]
        }
    }
}

#[test]
fn distinct_types_sharing_a_name_both_run() {
    let mut registry = CaseRegistry::new();
    registry
        .register::<posts::Basic>()
        .register::<users::Basic>()
        .register::<posts::Basic>();
    assert_eq!(registry.len(), 2);

    let names: Vec<String> = registry.names().map(str::to_string).collect();
    assert!(names.contains(&"Basic".to_string()));
    assert!(names.iter().any(|n| n.ends_with("users::Basic")), "{names:?}");

    let mut sink = BufferSink::new();
    let report = Suite::new(registry)
        .run_all(&mut RunContext::standalone(), &mut sink)
        .unwrap();
    assert_eq!(report.cases.len(), 2);
    assert_eq!(report.tally.case_count, 2);
    assert_eq!(report.tally.pass_count, 1);
    assert_eq!(report.tally.fail_count, 1);
    assert!(!report.tally.is_clean());
    assert!(report.cases.iter().any(|c| c.name.ends_with("users::Basic")));
}
