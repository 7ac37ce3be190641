// SPDX-License-Identifier: MIT

//! `PortGroup<T>`: an ordered, name-indexed collection of per-port state,
//! each cell under its own lock
//! and watch buffer are mutated under a per-port or per-FB mutex").
//! Declaration order is preserved so snapshots and output delivery walk
//! ports in the same order they were declared in the `.fbt` interface.

use parking_lot::Mutex;
use std::collections::HashMap;

pub struct PortGroup<T> {
    order: Vec<String>,
    index: HashMap<String, usize>,
    state: Vec<Mutex<T>>,
}

impl<T> PortGroup<T> {
    pub fn new(ports: Vec<(String, T)>) -> Self {
        let mut order = Vec::with_capacity(ports.len());
        let mut index = HashMap::with_capacity(ports.len());
        let mut state = Vec::with_capacity(ports.len());
        for (i, (name, value)) in ports.into_iter().enumerate() {
            index.insert(name.clone(), i);
            order.push(name);
            state.push(Mutex::new(value));
        }
        Self {
            order,
            index,
            state,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, name: &str) -> Option<&Mutex<T>> {
        self.index.get(name).map(|&i| &self.state[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Ports in declaration order, for snapshotting and output delivery.
    pub fn iter_in_order(&self) -> impl Iterator<Item = (&str, &Mutex<T>)> {
        self.order
            .iter()
            .zip(self.state.iter())
            .map(|(name, cell)| (name.as_str(), cell))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_declaration_order() {
        let group = PortGroup::new(vec![
            ("b".to_string(), 1),
            ("a".to_string(), 2),
        ]);
        let names: Vec<&str> = group.iter_in_order().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn get_looks_up_by_name() {
        let group = PortGroup::new(vec![("p".to_string(), 7)]);
        assert_eq!(*group.get("p").unwrap().lock(), 7);
        assert!(group.get("nope").is_none());
    }
}
