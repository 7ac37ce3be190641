// SPDX-License-Identifier: MIT

//! The `Behavior` trait: the one-shot `schedule` contract every FB type
//! implements.

use fbrt_core::Value;

/// A function block's pure scheduling logic.
///
/// `schedule` receives a snapshot of the current input values (events
/// included, represented as their counter's `Value::Int`) and returns the
/// new output values in declared order, or `None` to signal an internal
/// fault — the worker treats `None` exactly like a `NullOutput` error and
/// stops.
pub trait Behavior: Send + Sync {
    fn schedule(&self, inputs: &[Value]) -> Option<Vec<Value>>;

    /// Declared input names, in the order `schedule` expects them. Used
    /// only for the arity/name cross-check against `InputVars` at load
    /// time; never consulted on the hot path.
    fn input_names(&self) -> &[&str];

    fn arity(&self) -> usize {
        self.input_names().len()
    }
}

/// A no-argument constructor for a registered behavior type, standing in
/// for the original "reloadable module with a bare class constructor"
/// contract (see `crate` docs).
pub type BehaviorFactory = fn() -> Box<dyn Behavior>;
