//! A stack and the cases that exercise it.

use casework::prelude::*;

#[derive(Default)]
pub struct StackTest {
    stack: Vec<i64>,
}

impl StackTest {
    fn pop(&mut self) -> Result<i64, Raised> {
        self.stack
            .pop()
            .ok_or_else(|| Raised::new("EmptyStack", "pop from an empty stack"))
    }

    fn test_push_then_pop(&mut self, t: &mut Assertions) -> Outcome {
        self.stack.push(3);
        let top = self.pop()?;
        t.assert_identical(top, 3, "pop returns the last pushed value");
        t.assert_true(self.stack.is_empty(), "stack is empty again");
        Ok(())
    }

    fn test_pop_on_empty_stack_raises(&mut self, t: &mut Assertions) -> Outcome {
        t.assert_exception("EmptyStack", "popping an empty stack raises");
        self.pop()?;
        Ok(())
    }

    fn test_depth_compares_with_text(&mut self, t: &mut Assertions) -> Outcome {
        self.stack.extend([1, 2, 3]);
        t.assert_equal(self.stack.len(), "3", "depth equals its decimal text");
        Ok(())
    }
}

impl TestCase for StackTest {
    fn methods() -> Vec<TestMethod<Self>> {
        methods![Self =>
            test_push_then_pop,
            test_pop_on_empty_stack_raises,
            test_depth_compares_with_text,
        ]
    }

    fn setup(&mut self, _t: &mut Assertions) -> Outcome {
        self.stack.clear();
        Ok(())
    }
}

pub fn register(registry: &mut CaseRegistry) {
    registry.register::<StackTest>();
}
