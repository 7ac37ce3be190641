// SPDX-License-Identifier: MIT

//! Port state: event counters and variable values, each with a watch ring.

use crate::value::{DataType, Value};
use crate::watch::{WatchBuffer, WatchSample};

/// Declared kind of a port, carried on its definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    Event,
    Variable(DataType),
}

/// A single port descriptor parsed from a `.fbt` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDescriptor {
    pub name: String,
    pub kind: PortKind,
}

/// Runtime state of an event port: a monotonic counter, unset until the
/// first push, which sets it to 1.
#[derive(Debug, Default)]
pub struct EventPortState {
    counter: Option<u64>,
    watch: WatchBuffer,
}

impl EventPortState {
    pub fn counter(&self) -> Option<u64> {
        self.counter
    }

    /// Increment the counter (unset -> 1, otherwise +1) and return the new
    /// value.
    pub fn push(&mut self) -> u64 {
        let next = self.counter.map_or(1, |c| c + 1);
        self.counter = Some(next);
        next
    }

    pub fn set_watch(&mut self, enabled: bool) {
        self.watch.set_enabled(enabled);
    }

    pub fn is_watch(&self) -> bool {
        self.watch.is_enabled()
    }

    pub fn sample(&mut self, timestamp_ms: u64) {
        if let Some(c) = self.counter {
            self.watch.push(timestamp_ms, WatchSample::Event(c));
        }
    }

    pub fn drain_watch(&mut self, cursor: u64) -> Vec<(u64, WatchSample)> {
        self.watch.drain_since(cursor)
    }
}

/// Runtime state of a variable port.
#[derive(Debug)]
pub struct VarPortState {
    value: Value,
    dtype: DataType,
    watch: WatchBuffer,
}

impl VarPortState {
    pub fn new(dtype: DataType) -> Self {
        Self {
            value: Value::Unset,
            dtype,
            watch: WatchBuffer::new(),
        }
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set(&mut self, value: Value) {
        self.value = value;
    }

    pub fn set_watch(&mut self, enabled: bool) {
        self.watch.set_enabled(enabled);
    }

    pub fn is_watch(&self) -> bool {
        self.watch.is_enabled()
    }

    pub fn sample(&mut self, timestamp_ms: u64) {
        self.watch.push(timestamp_ms, WatchSample::Var(self.value.clone()));
    }

    pub fn drain_watch(&mut self, cursor: u64) -> Vec<(u64, WatchSample)> {
        self.watch.drain_since(cursor)
    }
}
