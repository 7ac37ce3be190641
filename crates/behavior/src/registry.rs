// SPDX-License-Identifier: MIT

//! `BehaviorRegistry`: the named-factory map standing in for Rust's lack of
//! a safe `dlopen`-class reload path.

use crate::behavior::{Behavior, BehaviorFactory};
use crate::builtin;
use std::collections::HashMap;

#[derive(Clone, Default)]
pub struct BehaviorRegistry {
    factories: HashMap<String, BehaviorFactory>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the behaviors this host ships
    /// in-process.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("E_SWITCH", builtin::e_switch as BehaviorFactory);
        registry.register("START", builtin::start as BehaviorFactory);
        registry
    }

    pub fn register(&mut self, type_name: impl Into<String>, factory: BehaviorFactory) {
        self.factories.insert(type_name.into(), factory);
    }

    pub fn get(&self, type_name: &str) -> Option<BehaviorFactory> {
        self.factories.get(type_name).copied()
    }

    pub fn construct(&self, type_name: &str) -> Option<Box<dyn Behavior>> {
        self.get(type_name).map(|factory| factory())
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_register_e_switch_and_start() {
        let registry = BehaviorRegistry::with_builtins();
        assert!(registry.get("E_SWITCH").is_some());
        assert!(registry.get("START").is_some());
        assert!(registry.get("NOPE").is_none());
    }

    #[test]
    fn construct_invokes_the_factory() {
        let registry = BehaviorRegistry::with_builtins();
        let behavior = registry.construct("E_SWITCH").unwrap();
        assert_eq!(behavior.arity(), 1);
    }
}
