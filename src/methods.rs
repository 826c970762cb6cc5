// src/methods.rs
//
// Scripted mock responses: per-call FIFO queues, per-argument-list values,
// and invocation counters. Instance scope lives on the mock object;
// class scope is process-wide and must be reset explicitly.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use log::debug;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::descriptor::{MockError, MockTarget};

/// Process-wide class-scoped mock state, keyed by mock type name.
/// Never reset implicitly; callers reset before use.
static CLASS_STATE: Lazy<Mutex<HashMap<String, ResponseState>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Canonical encoding of an ordered argument list, used as a map key.
/// serde_json maps are sorted, so equal values always encode equally.
fn canonical_key(params: &[Value]) -> String {
    serde_json::to_string(params).expect("JSON values always encode")
}

/// Response bookkeeping shared by the instance and class scopes.
#[derive(Debug, Default)]
struct ResponseState {
    stacks: HashMap<String, VecDeque<Value>>,
    keyed: HashMap<String, HashMap<String, Value>>,
    counts: HashMap<String, u64>,
}

impl ResponseState {
    fn set_stack(&mut self, method: &str, values: Vec<Value>) {
        self.stacks.insert(method.to_string(), values.into());
    }

    fn set_keyed(&mut self, method: &str, key: String, value: Value) {
        self.keyed.entry(method.to_string()).or_default().insert(key, value);
    }

    fn next(&mut self, method: &str, default: Value) -> Value {
        self.bump(method);
        match self.stacks.get_mut(method).and_then(VecDeque::pop_front) {
            Some(value) => value,
            None => default,
        }
    }

    fn keyed_response(&mut self, method: &str, key: &str, default: Value) -> Value {
        self.bump(method);
        self.keyed
            .get(method)
            .and_then(|values| values.get(key))
            .cloned()
            .unwrap_or(default)
    }

    fn count(&self, method: &str) -> u64 {
        self.counts.get(method).copied().unwrap_or(0)
    }

    fn bump(&mut self, method: &str) {
        *self.counts.entry(method.to_string()).or_insert(0) += 1;
    }

    /// Bulk registration clears queues and counters but keeps the
    /// parameter-keyed values, matching the instance-scope contract.
    fn clear_stacks_and_counts(&mut self) {
        self.stacks.clear();
        self.counts.clear();
    }

    fn clear_all(&mut self) {
        self.stacks.clear();
        self.keyed.clear();
        self.counts.clear();
    }
}

/// Instance-scoped mock responses. Embed one of these in a mock object and
/// route the mocked methods through it.
///
/// Every registration validates the method name against the mock's
/// [`MockTarget`] and fails fast when it is not declared. Lookups never
/// fail; a missing queue or key falls back to the supplied default.
#[derive(Debug)]
pub struct MockMethods {
    target: MockTarget,
    state: ResponseState,
}

impl MockMethods {
    pub fn new(target: MockTarget) -> Self {
        Self {
            target,
            state: ResponseState::default(),
        }
    }

    pub fn target(&self) -> &MockTarget {
        &self.target
    }

    // ===== Registration =====

    /// Replace the queue of return values for `method`. The front of the
    /// list is returned first.
    pub fn set_responses(&mut self, method: &str, values: Vec<Value>) -> Result<(), MockError> {
        self.target.check_method(method)?;
        debug!("queueing {} response(s) for {}::{}", values.len(), self.target.name(), method);
        self.state.set_stack(method, values);
        Ok(())
    }

    /// Clear all queues and counters, then set a queue per entry.
    /// Parameter-keyed responses are left in place.
    pub fn set_all_responses(&mut self, stacks: Vec<(&str, Vec<Value>)>) -> Result<(), MockError> {
        self.state.clear_stacks_and_counts();
        for (method, values) in stacks {
            self.set_responses(method, values)?;
        }
        Ok(())
    }

    /// Register the value returned whenever `method` is called with exactly
    /// `params`. Registering the same method and parameters again replaces
    /// the previous value.
    pub fn set_response_with_params(
        &mut self,
        method: &str,
        params: &[Value],
        value: Value,
    ) -> Result<(), MockError> {
        self.target.check_method(method)?;
        self.state.set_keyed(method, canonical_key(params), value);
        Ok(())
    }

    // ===== Lookup =====

    /// Pop the next queued response for `method`, or return `default` when
    /// the queue is empty or absent. Always counts the invocation.
    pub fn next_response(&mut self, method: &str, default: Value) -> Value {
        self.state.next(method, default)
    }

    /// Return the value registered for `method` with exactly `params`, or
    /// `default` when none matches. Always counts the invocation.
    pub fn response_with_params(&mut self, method: &str, params: &[Value], default: Value) -> Value {
        self.state.keyed_response(method, &canonical_key(params), default)
    }

    /// Number of lookups performed for `method`, including those that fell
    /// back to the default. Zero if never looked up.
    pub fn call_count(&self, method: &str) -> u64 {
        self.state.count(method)
    }
}

/// Class-scoped mock responses, shared across every instance of a mock
/// type and across test cases in the same process.
///
/// State is keyed by the target's name and persists until [`reset`] is
/// called; tests that use class scope reset it defensively up front, since
/// no teardown hook is guaranteed to run.
///
/// [`reset`]: StaticMocks::reset
#[derive(Debug)]
pub struct StaticMocks {
    target: MockTarget,
}

impl StaticMocks {
    pub fn new(target: MockTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &MockTarget {
        &self.target
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ResponseState) -> T) -> T {
        let mut map = CLASS_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(map.entry(self.target.name().to_string()).or_default())
    }

    /// Clear queues, parameter-keyed responses, and counters for this mock
    /// type in one step.
    pub fn reset(&self) {
        debug!("resetting class-scoped responses for {}", self.target.name());
        self.with_state(ResponseState::clear_all);
    }

    /// Replace the class-scoped queue of return values for `method`.
    pub fn set_responses(&self, method: &str, values: Vec<Value>) -> Result<(), MockError> {
        self.target.check_method(method)?;
        debug!("queueing {} response(s) for {}::{}", values.len(), self.target.name(), method);
        self.with_state(|state| state.set_stack(method, values));
        Ok(())
    }

    /// Reset the class scope entirely, then set a queue per entry.
    pub fn set_all_responses(&self, stacks: Vec<(&str, Vec<Value>)>) -> Result<(), MockError> {
        self.reset();
        for (method, values) in stacks {
            self.set_responses(method, values)?;
        }
        Ok(())
    }

    /// Register the class-scoped value returned when `method` is called
    /// with exactly `params`. Last registration wins.
    pub fn set_response_with_params(
        &self,
        method: &str,
        params: &[Value],
        value: Value,
    ) -> Result<(), MockError> {
        self.target.check_method(method)?;
        let key = canonical_key(params);
        self.with_state(|state| state.set_keyed(method, key, value));
        Ok(())
    }

    /// Pop the next class-scoped response for `method`, or `default`.
    pub fn next_response(&self, method: &str, default: Value) -> Value {
        self.with_state(|state| state.next(method, default))
    }

    /// Class-scoped parameter-keyed lookup, falling back to `default`.
    pub fn response_with_params(&self, method: &str, params: &[Value], default: Value) -> Value {
        let key = canonical_key(params);
        self.with_state(|state| state.keyed_response(method, &key, default))
    }

    /// Class-scoped lookup count for `method`.
    pub fn call_count(&self, method: &str) -> u64 {
        self.with_state(|state| state.count(method))
    }
}
