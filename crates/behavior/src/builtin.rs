// SPDX-License-Identifier: MIT

//! Behaviors shipped in-process rather than discovered on disk: the
//! resource type invoked once at `start_work` and the `E_SWITCH` example
//! type used throughout the test scenarios.
//!
//! Event outputs are reported as "fire" (any value other than
//! `Value::Unset`) or "no fire" (`Value::Unset`); the owning FB worker
//! turns a fire into an actual counter increment via
//! `EventPortState::push`, so a behavior never needs to know an output
//! port's prior counter to stay pure.

use crate::behavior::Behavior;
use fbrt_core::Value;

struct EventFire;

const FIRE: Value = Value::Bool(true);

impl Behavior for EventFire {
    fn schedule(&self, _inputs: &[Value]) -> Option<Vec<Value>> {
        Some(vec![FIRE])
    }

    fn input_names(&self) -> &[&str] {
        &[]
    }
}

/// `START`'s behavior: no inputs, fires its one output (`COLD`) every
/// invocation.
pub fn start() -> Box<dyn Behavior> {
    Box::new(EventFire)
}

/// The textbook IEC 61499 `E_SWITCH`: routes `EI` to `EO0` when `G` is
/// false or unset, to `EO1` when `G` is true.
struct ESwitch;

impl Behavior for ESwitch {
    fn schedule(&self, inputs: &[Value]) -> Option<Vec<Value>> {
        let g = matches!(inputs.get(1), Some(Value::Bool(true)));
        if g {
            Some(vec![Value::Unset, FIRE])
        } else {
            Some(vec![FIRE, Value::Unset])
        }
    }

    fn input_names(&self) -> &[&str] {
        &["G"]
    }
}

pub fn e_switch() -> Box<dyn Behavior> {
    Box::new(ESwitch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn e_switch_routes_to_eo0_when_g_is_unset() {
        let behavior = e_switch();
        let out = behavior.schedule(&[Value::Int(1), Value::Unset]).unwrap();
        assert_eq!(out, vec![FIRE, Value::Unset]);
    }

    #[test]
    fn e_switch_routes_to_eo1_when_g_is_true() {
        let behavior = e_switch();
        let out = behavior
            .schedule(&[Value::Int(1), Value::Bool(true)])
            .unwrap();
        assert_eq!(out, vec![Value::Unset, FIRE]);
    }

    #[test]
    fn start_fires_unconditionally() {
        let behavior = start();
        assert_eq!(behavior.schedule(&[]).unwrap(), vec![FIRE]);
    }
}
