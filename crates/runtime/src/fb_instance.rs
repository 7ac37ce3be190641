// SPDX-License-Identifier: MIT

//! `FbHandle`: the state held per FB instance, plus the
//! pre-resolved outbound edge lists that let a worker deliver outputs
//! without ever taking the Configuration's dictionary lock — edges are
//! stored as resolved handles, not names looked up on every delivery.

use crate::port_group::PortGroup;
use fbrt_behavior::BehaviorHandle;
use fbrt_core::{EventPortState, FbName, TypeName, VarPortState};
use fbrt_typedef::FbDefinition;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Notify};
use tokio_util::sync::CancellationToken;

/// An outbound edge, pre-resolved to its destination's handle so delivery
/// never touches the FB dictionary.
#[derive(Clone)]
pub struct ResolvedEdge {
    pub dest: Arc<FbHandle>,
    pub dest_port: String,
}

/// An inbound edge, kept name-only: introspection never needs to reach
/// into the source FB.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundEdge {
    pub source_fb: FbName,
    pub source_port: String,
}

pub struct FbHandle {
    pub name: FbName,
    pub fb_type: TypeName,

    pub input_events: PortGroup<EventPortState>,
    pub input_vars: PortGroup<VarPortState>,
    pub output_events: PortGroup<EventPortState>,
    pub output_vars: PortGroup<VarPortState>,

    pub input_connections: Mutex<HashMap<String, Vec<InboundEdge>>>,
    pub output_connections: Mutex<HashMap<String, Vec<ResolvedEdge>>>,

    /// Receiving end of the behavior hot-reload mailbox.
    /// The owning worker task is the sole consumer.
    pub reload: Mutex<watch::Receiver<BehaviorHandle>>,

    pub trigger: Notify,
    pub cancel: CancellationToken,
    pub done: AtomicBool,
}

impl FbHandle {
    pub fn new(
        name: FbName,
        fb_type: TypeName,
        definition: &FbDefinition,
        reload: watch::Receiver<BehaviorHandle>,
    ) -> Self {
        let to_event_group = |ports: &[fbrt_core::PortDescriptor]| {
            PortGroup::new(
                ports
                    .iter()
                    .map(|p| (p.name.clone(), EventPortState::default()))
                    .collect(),
            )
        };
        let to_var_group = |ports: &[fbrt_core::PortDescriptor]| {
            PortGroup::new(
                ports
                    .iter()
                    .map(|p| {
                        let dtype = match p.kind {
                            fbrt_core::PortKind::Variable(dtype) => dtype,
                            fbrt_core::PortKind::Event => fbrt_core::DataType::String,
                        };
                        (p.name.clone(), VarPortState::new(dtype))
                    })
                    .collect(),
            )
        };

        Self {
            name,
            fb_type,
            input_events: to_event_group(&definition.input_events),
            input_vars: to_var_group(&definition.input_vars),
            output_events: to_event_group(&definition.output_events),
            output_vars: to_var_group(&definition.output_vars),
            input_connections: Mutex::new(HashMap::new()),
            output_connections: Mutex::new(HashMap::new()),
            reload: Mutex::new(reload),
            trigger: Notify::new(),
            cancel: CancellationToken::new(),
            done: AtomicBool::new(false),
        }
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    pub fn stop(&self) {
        self.cancel.cancel();
        self.trigger.notify_one();
    }

    /// Push an event to `port_name`, incrementing its counter and waking
    /// this FB's worker (coalescing: the `Notify` collapses repeated
    /// pending wakeups into one).
    pub fn push_input_event(&self, port_name: &str) -> Option<u64> {
        let counter = {
            let cell = self.input_events.get(port_name)?;
            let mut state = cell.lock();
            state.push()
        };
        self.trigger.notify_one();
        Some(counter)
    }
}
