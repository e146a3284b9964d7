//! Every way a test method can fail, one method each.

use casework::prelude::*;

#[derive(Default)]
pub struct BrokenExamplesTest;

impl BrokenExamplesTest {
    fn test_failed_assertion(&mut self, t: &mut Assertions) -> Outcome {
        t.assert_true("yes", "a truthy string is not true");
        Ok(())
    }

    fn test_unmatched_error(&mut self, _t: &mut Assertions) -> Outcome {
        let _: i32 = "twelve".parse()?;
        Ok(())
    }

    fn test_unmet_expectation(&mut self, t: &mut Assertions) -> Outcome {
        t.assert_exception("Timeout", "operation should time out");
        Ok(())
    }

    fn test_outstanding_check(&mut self, t: &mut Assertions) -> Outcome {
        t.check("cleanup", "cleanup hook never ran");
        Ok(())
    }

    fn test_mismatched_error(&mut self, t: &mut Assertions) -> Outcome {
        t.assert_exception("Timeout", "expects a timeout");
        raise!(Refused, "connection refused");
    }
}

impl TestCase for BrokenExamplesTest {
    fn methods() -> Vec<TestMethod<Self>> {
        methods![Self =>
            test_failed_assertion,
            test_unmatched_error,
            test_unmet_expectation,
            test_outstanding_check,
            test_mismatched_error,
        ]
    }
}

pub fn register(registry: &mut CaseRegistry) {
    registry.register::<BrokenExamplesTest>();
}
