// SPDX-License-Identifier: MIT

//! The per-FB execution loop, one Tokio task per FB instance excluding
//! `START`: a spawned task is the concurrency primitive for a per-entity
//! background loop here, not an OS thread.

use crate::error::WorkerError;
use crate::fb_instance::FbHandle;
use fbrt_behavior::{Behavior, BehaviorHandle};
use fbrt_core::{Clock, Value};
use std::sync::Arc;

/// Snapshot every input port in declaration order (events, then
/// variables) — the argument vector `behavior.schedule` receives.
pub fn snapshot_inputs(handle: &FbHandle) -> Vec<Value> {
    let mut snapshot = Vec::with_capacity(handle.input_events.len() + handle.input_vars.len());
    for (_, cell) in handle.input_events.iter_in_order() {
        let counter = cell.lock().counter();
        snapshot.push(counter.map_or(Value::Unset, |c| Value::Int(c as i64)));
    }
    for (_, cell) in handle.input_vars.iter_in_order() {
        snapshot.push(cell.lock().value().clone());
    }
    snapshot
}

/// Total declared output arity (events + variables), for the step-6 arity
/// check on `schedule`'s return value.
pub fn output_arity(handle: &FbHandle) -> usize {
    handle.output_events.len() + handle.output_vars.len()
}

/// Apply the returned output vector to this FB's own output ports
///: event outputs fire (any non-`Unset` value calls
/// `EventPortState::push`) or stay silent; variable outputs overwrite
/// unconditionally.
fn apply_outputs(handle: &FbHandle, outputs: &[Value]) -> Vec<bool> {
    let event_count = handle.output_events.len();
    let mut fired = Vec::with_capacity(event_count);

    for (i, (_, cell)) in handle.output_events.iter_in_order().enumerate() {
        let should_fire = !matches!(outputs[i], Value::Unset);
        if should_fire {
            cell.lock().push();
        }
        fired.push(should_fire);
    }
    for (i, (_, cell)) in handle.output_vars.iter_in_order().enumerate() {
        cell.lock().set(outputs[event_count + i].clone());
    }
    fired
}

/// Walk outbound edges in declaration order of outputs, then insertion
/// order of edges on each output, delivering fired events
/// and writing every variable output downstream.
fn propagate_outputs(handle: &FbHandle, fired: &[bool]) {
    let edges = handle.output_connections.lock();

    for (i, (port_name, _)) in handle.output_events.iter_in_order().enumerate() {
        if !fired[i] {
            continue;
        }
        if let Some(targets) = edges.get(port_name) {
            for edge in targets {
                edge.dest.push_input_event(&edge.dest_port);
            }
        }
    }
    for (port_name, cell) in handle.output_vars.iter_in_order() {
        let value = cell.lock().value().clone();
        if let Some(targets) = edges.get(port_name) {
            for edge in targets {
                if let Some(dst_cell) = edge.dest.input_vars.get(&edge.dest_port) {
                    dst_cell.lock().set(value.clone());
                }
            }
        }
    }
}

/// Sample every watched port's current value into its ring, tagged with
/// `clock`'s current time. Called once after the input
/// snapshot and once after output propagation.
fn sample_watched_inputs(handle: &FbHandle, now_ms: u64) {
    for (_, cell) in handle.input_events.iter_in_order() {
        let mut state = cell.lock();
        if state.is_watch() {
            state.sample(now_ms);
        }
    }
    for (_, cell) in handle.input_vars.iter_in_order() {
        let mut state = cell.lock();
        if state.is_watch() {
            state.sample(now_ms);
        }
    }
}

fn sample_watched_outputs(handle: &FbHandle, now_ms: u64) {
    for (_, cell) in handle.output_events.iter_in_order() {
        let mut state = cell.lock();
        if state.is_watch() {
            state.sample(now_ms);
        }
    }
    for (_, cell) in handle.output_vars.iter_in_order() {
        let mut state = cell.lock();
        if state.is_watch() {
            state.sample(now_ms);
        }
    }
}

/// Invokes `behavior.schedule` once: snapshot, invoke, apply, propagate,
/// sample. Returns `Err` on any of the fatal conditions (arity mismatch or
/// a null schedule result); the caller stops the worker on `Err`.
pub fn execute_once(
    handle: &FbHandle,
    behavior: &dyn Behavior,
    clock: &impl Clock,
) -> Result<(), WorkerError> {
    let snapshot = snapshot_inputs(handle);
    sample_watched_inputs(handle, clock.epoch_ms());

    let outputs = behavior.schedule(&snapshot).ok_or(WorkerError::NullOutput)?;
    let expected = output_arity(handle);
    if outputs.len() != expected {
        return Err(WorkerError::ArityError {
            expected,
            got: outputs.len(),
        });
    }

    let fired = apply_outputs(handle, &outputs);
    propagate_outputs(handle, &fired);
    sample_watched_outputs(handle, clock.epoch_ms());
    Ok(())
}

/// The worker task body. Runs until `handle.cancel` fires. `behavior` is
/// the initially loaded instance; hot reloads are drained non-blockingly
/// from `handle.reload` before each invocation.
pub async fn run(handle: Arc<FbHandle>, mut behavior: BehaviorHandle, clock: impl Clock) {
    loop {
        tokio::select! {
            _ = handle.cancel.cancelled() => break,
            _ = handle.trigger.notified() => {}
        }
        if handle.cancel.is_cancelled() {
            break;
        }

        {
            let mut reload = handle.reload.lock();
            if reload.has_changed().unwrap_or(false) {
                behavior = reload.borrow_and_update().clone();
            }
        }

        match execute_once(&handle, behavior.as_ref(), &clock) {
            Ok(()) => {}
            Err(error) => {
                tracing::error!(fb = %handle.name, %error, "FB worker stopped");
                break;
            }
        }
    }
    handle.done.store(true, std::sync::atomic::Ordering::Release);
}
