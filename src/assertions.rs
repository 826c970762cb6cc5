// src/assertions.rs
//
// Expected-call stacks for mock objects. A mocked method hands its actual
// arguments to the stack, which pops the next expected set and asserts the
// two match. Failures panic, which is how the test harness reports them;
// this keeps test outcomes distinct from MockError configuration errors.

use std::collections::{HashMap, VecDeque};

use serde_json::Value;

use crate::descriptor::MockTarget;

/// Per-method FIFOs of expected parameter-value lists.
///
/// Parameter names in failure messages come from the target's descriptors,
/// the same data used to validate response registrations.
#[derive(Debug)]
pub struct AssertionStack {
    target: MockTarget,
    stacks: HashMap<String, VecDeque<Vec<Value>>>,
}

impl AssertionStack {
    pub fn new(target: MockTarget) -> Self {
        Self {
            target,
            stacks: HashMap::new(),
        }
    }

    /// Discard every queued expectation.
    pub fn reset(&mut self) {
        self.stacks.clear();
    }

    /// Queue one expected parameter list for `method`.
    pub fn expect_call(&mut self, method: &str, params: Vec<Value>) {
        self.stacks.entry(method.to_string()).or_default().push_back(params);
    }

    /// Queue several expected parameter lists for `method`, in call order.
    pub fn expect_calls(&mut self, method: &str, calls: Vec<Vec<Value>>) {
        for params in calls {
            self.expect_call(method, params);
        }
    }

    /// Number of expectations still queued for `method`.
    pub fn pending(&self, method: &str) -> usize {
        self.stacks.get(method).map_or(0, VecDeque::len)
    }

    /// Pop the next expected parameter list for `method` and assert that
    /// `actual` matches it, count first and then each value in order.
    ///
    /// Panics on mismatch, naming the offending parameter and the mocked
    /// method. A call with no queued expectation is not checked.
    pub fn verify_call(&mut self, method: &str, actual: &[Value]) {
        let expected = match self.stacks.get_mut(method).and_then(VecDeque::pop_front) {
            Some(expected) => expected,
            None => return,
        };

        let reference = self.target.reference_name();
        assert_eq!(
            expected.len(),
            actual.len(),
            "the number of expected and passed-in parameters does not match for the mocked {}::{}()",
            reference,
            method,
        );

        let descriptor = self.target.find_method(method);
        for (index, (expected_value, actual_value)) in expected.iter().zip(actual).enumerate() {
            let param = descriptor
                .and_then(|d| d.param_name(index))
                .unwrap_or("[unknown parameter]");
            assert_eq!(
                expected_value, actual_value,
                "{} parameter does not have the expected value for the mocked {}::{}()",
                param, reference, method,
            );
        }
    }
}
