//! Pending checks used as "this hook must fire" obligations.

use casework::prelude::*;

#[derive(Default)]
pub struct HookTest {
    fired: Vec<&'static str>,
}

impl HookTest {
    fn dispatch(&mut self, t: &mut Assertions, event: &'static str) {
        self.fired.push(event);
        t.pass_check(event);
    }

    fn test_save_hook_fires(&mut self, t: &mut Assertions) -> Outcome {
        t.check("saved", "save hook fires");
        self.dispatch(t, "saved");
        t.assert_equal(self.fired.len(), 1, "exactly one hook fired");
        Ok(())
    }

    fn test_checks_clear_independently(&mut self, t: &mut Assertions) -> Outcome {
        t.check("published", "publish hook fires");
        self.dispatch(t, "saved");
        self.dispatch(t, "published");
        self.dispatch(t, "published");
        t.assert_false(self.fired.is_empty(), "hooks were recorded");
        Ok(())
    }
}

impl TestCase for HookTest {
    fn methods() -> Vec<TestMethod<Self>> {
        methods![Self => test_save_hook_fires, test_checks_clear_independently]
    }

    fn teardown(&mut self, _t: &mut Assertions) -> Outcome {
        self.fired.clear();
        Ok(())
    }
}

pub fn register(registry: &mut CaseRegistry) {
    registry.register::<HookTest>();
}
