// SPDX-License-Identifier: MIT

//! `Configuration`: the named FB network and its public mutating
//! operations. A single `parking_lot::Mutex` guards the FB
//! dictionary itself (graph topology changes are rare and already
//! serialized by the client protocol); per-port state is guarded
//! independently so a running worker never blocks a concurrent `create_fb`.

use crate::error::ConfigurationError;
use crate::fb_instance::{FbHandle, InboundEdge, ResolvedEdge};
use crate::worker;
use fbrt_behavior::{BehaviorLoader, BehaviorRegistry};
use fbrt_core::{convert_type, split_port_ref, Clock, ConfigId, DataType, FbName, TypeName, Value};
use fbrt_typedef::{parse_fbt, FbDefinition, TypeRegistry};
use fbrt_wire::{WatchGroup, WatchPortSamples};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The event pulse literal recognized by `write_connection`:
/// writing it to an event port increments the counter exactly as a real
/// propagated event would.
const EVENT_PULSE: &str = "$e";

const COLD_PORT: &str = "COLD";

/// A single port's current state, as returned by [`Configuration::read_attr`].
#[derive(Debug, Clone, PartialEq)]
pub enum PortSnapshot {
    Event { counter: Option<u64> },
    Var { dtype: DataType, value: Value },
}

struct FbEntry {
    handle: Arc<FbHandle>,
    definition: FbDefinition,
    worker: Option<JoinHandle<()>>,
    reload_watcher: Option<JoinHandle<()>>,
}

pub struct Configuration<C: Clock> {
    id: ConfigId,
    fbs: Mutex<HashMap<FbName, FbEntry>>,
    types: TypeRegistry,
    behaviors: BehaviorRegistry,
    clock: C,
}

impl<C: Clock> Configuration<C> {
    pub fn new(id: ConfigId, types: TypeRegistry, behaviors: BehaviorRegistry, clock: C) -> Self {
        Self {
            id,
            fbs: Mutex::new(HashMap::new()),
            types,
            behaviors,
            clock,
        }
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Creates an FB instance of `fb_type` named `name`: loads the `.fbt`
    /// definition, loads its behavior, wires up the reload watcher, and
    /// registers it — without starting a worker yet. FB instances can exist
    /// before the network runs; workers are spawned on `start_work`.
    pub fn create_fb(&self, name: FbName, fb_type: TypeName) -> Result<(), ConfigurationError> {
        if self.fbs.lock().contains_key(name.as_str()) {
            return Err(ConfigurationError::DuplicateFb(name.as_str().to_string()));
        }

        let definition_path = self
            .types
            .definition_path(fb_type.as_str())
            .map_err(fbrt_core::Error::from)?;
        let xml = std::fs::read_to_string(&definition_path)
            .map_err(|e| fbrt_core::Error::DefinitionParseError(e.to_string()))?;
        let definition = parse_fbt(&xml).map_err(fbrt_core::Error::from)?;

        let input_var_names: Vec<String> =
            definition.input_vars.iter().map(|p| p.name.clone()).collect();
        let loader = BehaviorLoader::new(&self.behaviors);
        let initial = loader.load(fb_type.as_str(), &input_var_names)?;
        let initial: fbrt_behavior::BehaviorHandle = Arc::from(initial);
        let (_tx, reload_rx) = watch::channel(initial.clone());

        let handle = Arc::new(FbHandle::new(name.clone(), fb_type.clone(), &definition, reload_rx));

        let impl_path = self
            .types
            .implementation_path(fb_type.as_str())
            .map_err(fbrt_core::Error::from)?;
        let factory = self
            .behaviors
            .get(fb_type.as_str())
            .ok_or_else(|| fbrt_behavior::BehaviorLoadError::UnknownType(fb_type.as_str().to_string()))?;
        let (reload_rx, reload_handle) = fbrt_behavior::spawn_reload_watcher(
            fb_type.as_str().to_string(),
            impl_path,
            factory,
            initial,
            handle.cancel.clone(),
        );
        *handle.reload.lock() = reload_rx;

        self.fbs.lock().insert(
            name,
            FbEntry {
                handle,
                definition,
                worker: None,
                reload_watcher: Some(reload_handle),
            },
        );
        Ok(())
    }

    fn get(&self, name: &str) -> Option<Arc<FbHandle>> {
        self.fbs.lock().get(name).map(|e| e.handle.clone())
    }

    fn resolve_ref(&self, port_ref: &str) -> Result<(Arc<FbHandle>, String), ConfigurationError> {
        let (fb_name, port_name) = split_port_ref(port_ref)
            .ok_or_else(|| ConfigurationError::MalformedPortRef(port_ref.to_string()))?;
        let handle = self
            .get(fb_name)
            .ok_or_else(|| fbrt_core::Error::UnknownFb(fb_name.to_string()))?;
        Ok((handle, port_name.to_string()))
    }

    /// Wire `source` to `destination`. Mixed event/variable connections
    /// are logged, not rejected — wiring stays permissive rather than
    /// enforcing a type check at connect time.
    pub fn create_connection(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<(), ConfigurationError> {
        let (src_handle, src_port) = self.resolve_ref(source)?;
        let (dst_handle, dst_port) = self.resolve_ref(destination)?;

        let src_is_event = src_handle.output_events.contains(&src_port);
        let src_is_var = src_handle.output_vars.contains(&src_port);
        if !src_is_event && !src_is_var {
            return Err(fbrt_core::Error::UnknownPort {
                fb: src_handle.name.to_string(),
                port: src_port,
            }
            .into());
        }
        let dst_is_event = dst_handle.input_events.contains(&dst_port);
        let dst_is_var = dst_handle.input_vars.contains(&dst_port);
        if !dst_is_event && !dst_is_var {
            return Err(fbrt_core::Error::UnknownPort {
                fb: dst_handle.name.to_string(),
                port: dst_port,
            }
            .into());
        }
        if src_is_event != dst_is_event {
            tracing::warn!(
                source, destination, "connection mixes an event port with a variable port"
            );
        }

        src_handle.output_connections.lock().entry(src_port.clone()).or_default().push(
            ResolvedEdge {
                dest: dst_handle.clone(),
                dest_port: dst_port.clone(),
            },
        );
        dst_handle
            .input_connections
            .lock()
            .entry(dst_port)
            .or_default()
            .push(InboundEdge {
                source_fb: src_handle.name.clone(),
                source_port: src_port,
            });
        Ok(())
    }

    /// `INIT` auto-wiring: for every FB other than `START`
    /// whose declared `INIT` input event has no incoming edge, wire
    /// `START.COLD -> <fb>.INIT`. Applied once, after a persisted
    /// deployment log has been fully replayed into a fresh Configuration —
    /// never during an interactive deployment session, where the tool is
    /// expected to wire `INIT` itself when it wants to.
    pub fn auto_wire_init(&self) {
        if self.get(fbrt_core::START_FB_NAME).is_none() {
            tracing::warn!(config = %self.id, "no START FB present, skipping INIT auto-wiring");
            return;
        }
        let names: Vec<FbName> = self.fbs.lock().keys().cloned().collect();
        for name in names {
            if name.as_str() == fbrt_core::START_FB_NAME {
                continue;
            }
            let Some(handle) = self.get(name.as_str()) else {
                continue;
            };
            if !handle.input_events.contains("INIT") {
                continue;
            }
            let already_wired = handle
                .input_connections
                .lock()
                .get("INIT")
                .is_some_and(|edges| !edges.is_empty());
            if already_wired {
                continue;
            }
            let destination = format!("{}.INIT", name.as_str());
            let source = format!("{}.{}", fbrt_core::START_FB_NAME, fbrt_core::COLD_EVENT_NAME);
            if let Err(error) = self.create_connection(&source, &destination) {
                tracing::warn!(fb = %name, %error, "failed to auto-wire INIT");
            }
        }
    }

    /// Writes a literal constant to `destination`. `$e` pulses an event
    /// port's counter exactly as
    /// a propagated event would; any other literal is parsed for the
    /// destination's declared type and overwrites it directly, without
    /// waking the FB's worker (matching a wired variable write).
    pub fn write_connection(
        &self,
        constant: &str,
        destination: &str,
    ) -> Result<(), ConfigurationError> {
        let (handle, port) = self.resolve_ref(destination)?;

        if constant == EVENT_PULSE {
            handle
                .push_input_event(&port)
                .ok_or_else(|| fbrt_core::Error::UnknownPort {
                    fb: handle.name.to_string(),
                    port: port.clone(),
                })?;
            return Ok(());
        }

        let cell = handle
            .input_vars
            .get(&port)
            .ok_or_else(|| fbrt_core::Error::UnknownPort {
                fb: handle.name.to_string(),
                port: port.clone(),
            })?;
        let dtype = cell.lock().dtype();
        let value = convert_type(constant, dtype).unwrap_or(Value::Unset);
        cell.lock().set(value);
        Ok(())
    }

    /// Reads a single port's current state: an event port's counter, or a
    /// variable port's declared type and value. Introspection only — never
    /// touched by the wire protocol, which reaches ports only through
    /// `write_connection` and watches.
    pub fn read_attr(&self, port_ref: &str) -> Result<PortSnapshot, ConfigurationError> {
        let (handle, port) = self.resolve_ref(port_ref)?;

        if let Some(cell) = handle
            .input_events
            .get(&port)
            .or_else(|| handle.output_events.get(&port))
        {
            return Ok(PortSnapshot::Event {
                counter: cell.lock().counter(),
            });
        }
        if let Some(cell) = handle
            .input_vars
            .get(&port)
            .or_else(|| handle.output_vars.get(&port))
        {
            let guard = cell.lock();
            return Ok(PortSnapshot::Var {
                dtype: guard.dtype(),
                value: guard.value().clone(),
            });
        }
        Err(fbrt_core::Error::UnknownPort {
            fb: handle.name.to_string(),
            port,
        }
        .into())
    }

    /// Whether the named FB's worker has stopped, e.g. after a fatal
    /// `schedule` error. `START` and any unknown name report `false` —
    /// `START` never has a running worker to stop.
    pub fn is_done(&self, name: &str) -> bool {
        self.get(name).is_some_and(|handle| handle.is_done())
    }

    fn port_watch_toggle(
        &self,
        port_ref: &str,
        enabled: bool,
    ) -> Result<(), ConfigurationError> {
        let (handle, port) = self.resolve_ref(port_ref)?;
        if let Some(cell) = handle.input_events.get(&port) {
            cell.lock().set_watch(enabled);
        } else if let Some(cell) = handle.output_events.get(&port) {
            cell.lock().set_watch(enabled);
        } else if let Some(cell) = handle.input_vars.get(&port) {
            cell.lock().set_watch(enabled);
        } else if let Some(cell) = handle.output_vars.get(&port) {
            cell.lock().set_watch(enabled);
        } else {
            return Err(fbrt_core::Error::UnknownPort {
                fb: handle.name.to_string(),
                port,
            }
            .into());
        }
        Ok(())
    }

    pub fn create_watch(&self, port_ref: &str) -> Result<(), ConfigurationError> {
        self.port_watch_toggle(port_ref, true)
    }

    pub fn delete_watch(&self, port_ref: &str) -> Result<(), ConfigurationError> {
        self.port_watch_toggle(port_ref, false)
    }

    /// Drain every watched port's buffer since `cursor_ms`, grouped per FB
    /// in FB-dictionary iteration order. Groups with no
    /// sampled ports are kept here; `fbrt_wire::build_read_response` is the
    /// one that omits them from the wire response.
    pub fn read_watches(&self, cursor_ms: u64) -> Vec<WatchGroup> {
        let fbs = self.fbs.lock();
        let mut groups = Vec::with_capacity(fbs.len());
        for entry in fbs.values() {
            let handle = &entry.handle;
            let mut ports = Vec::new();
            for (name, cell) in handle.input_events.iter_in_order() {
                let mut state = cell.lock();
                if state.is_watch() {
                    ports.push(WatchPortSamples {
                        port_name: name.to_string(),
                        samples: state.drain_watch(cursor_ms),
                    });
                }
            }
            for (name, cell) in handle.output_events.iter_in_order() {
                let mut state = cell.lock();
                if state.is_watch() {
                    ports.push(WatchPortSamples {
                        port_name: name.to_string(),
                        samples: state.drain_watch(cursor_ms),
                    });
                }
            }
            for (name, cell) in handle.input_vars.iter_in_order() {
                let mut state = cell.lock();
                if state.is_watch() {
                    ports.push(WatchPortSamples {
                        port_name: name.to_string(),
                        samples: state.drain_watch(cursor_ms),
                    });
                }
            }
            for (name, cell) in handle.output_vars.iter_in_order() {
                let mut state = cell.lock();
                if state.is_watch() {
                    ports.push(WatchPortSamples {
                        port_name: name.to_string(),
                        samples: state.drain_watch(cursor_ms),
                    });
                }
            }
            groups.push(WatchGroup {
                fb_name: handle.name.to_string(),
                ports,
            });
        }
        groups
    }

    /// Spawn a worker for every FB except `START`, then fire `START` once
    /// directly, fanning its `COLD` output out over every wired `INIT`
    /// input. `start_work` itself never auto-wires `INIT` — that happens
    /// once, via `auto_wire_init`, when a persisted deployment log is
    /// replayed; an interactive deployment session only
    /// fans `COLD` out over the connections the tool explicitly asked for.
    pub fn start_work(&self) {
        let mut fbs = self.fbs.lock();

        for entry in fbs.values_mut() {
            if entry.handle.name.as_str() == fbrt_core::START_FB_NAME || entry.worker.is_some() {
                continue;
            }
            let handle = entry.handle.clone();
            let behavior = handle.reload.lock().borrow().clone();
            let clock = self.clock.clone();
            entry.worker = Some(tokio::spawn(worker::run(handle, behavior, clock)));
        }

        for entry in fbs.values() {
            if entry.handle.name.as_str() != fbrt_core::START_FB_NAME {
                continue;
            }
            let handle = &entry.handle;
            let behavior = handle.reload.lock().borrow().clone();
            let Some(outputs) = behavior.schedule(&[]) else {
                tracing::error!(fb = %handle.name, "START behavior returned no outputs");
                continue;
            };
            if outputs.len() != 1 {
                tracing::error!(fb = %handle.name, "START behavior has unexpected output arity");
                continue;
            }
            if matches!(outputs[0], Value::Unset) {
                continue;
            }
            if let Some(cell) = handle.output_events.get(COLD_PORT) {
                cell.lock().push();
            }
            let edges = handle.output_connections.lock();
            if let Some(targets) = edges.get(COLD_PORT) {
                for edge in targets {
                    edge.dest.push_input_event(&edge.dest_port);
                }
            }
        }
    }

    /// Signal every FB worker to stop and wait best-effort for them to
    /// finish.
    pub async fn stop_work(&self) {
        let handles: Vec<Arc<FbHandle>> = self.fbs.lock().values().map(|e| e.handle.clone()).collect();
        for handle in &handles {
            handle.stop();
        }
        let joins: Vec<JoinHandle<()>> = {
            let mut fbs = self.fbs.lock();
            fbs.values_mut().filter_map(|e| e.worker.take()).collect()
        };
        for join in joins {
            let _ = join.await;
        }
        let reload_joins: Vec<JoinHandle<()>> = {
            let mut fbs = self.fbs.lock();
            fbs.values_mut().filter_map(|e| e.reload_watcher.take()).collect()
        };
        for join in reload_joins {
            let _ = join.await;
        }
    }

    pub fn fb_count(&self) -> usize {
        self.fbs.lock().len()
    }

    pub fn contains_fb(&self, name: &str) -> bool {
        self.fbs.lock().contains_key(name)
    }
}
