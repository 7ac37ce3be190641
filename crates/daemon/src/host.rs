// SPDX-License-Identifier: MIT

//! `Host`: the server-wide state shared across connections — the
//! `config_id -> Configuration` map, the shared type/behavior registries,
//! and the single `data_model.fboot` log all Configurations persist
//! through (one such file per resources directory; nothing in the wire
//! grammar scopes it per Configuration).
//!
//! The general (config_id-less) request channel is collaborator-defined
//! and out of scope beyond routing. This host resolves that by lazily
//! creating a Configuration the first time a scoped request names an
//! unseen `config_id`, and answering any general request with a bare OK
//! status — recorded as a resolved choice in
//! DESIGN.md.

use fbrt_behavior::BehaviorRegistry;
use fbrt_core::{ConfigId, SystemClock};
use fbrt_runtime::Configuration;
use fbrt_storage::FbootLog;
use fbrt_typedef::TypeRegistry;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Host {
    configs: Mutex<HashMap<ConfigId, Arc<Configuration<SystemClock>>>>,
    types: TypeRegistry,
    behaviors: Arc<BehaviorRegistry>,
    pub fboot: Arc<Mutex<FbootLog>>,
}

impl Host {
    pub fn new(types: TypeRegistry, behaviors: BehaviorRegistry, fboot: FbootLog) -> Self {
        Self {
            configs: Mutex::new(HashMap::new()),
            types,
            behaviors: Arc::new(behaviors),
            fboot: Arc::new(Mutex::new(fboot)),
        }
    }

    /// Returns the named Configuration, creating an empty one on first
    /// reference.
    pub fn config_for(&self, config_id: &ConfigId) -> Arc<Configuration<SystemClock>> {
        let mut configs = self.configs.lock();
        configs
            .entry(config_id.clone())
            .or_insert_with(|| {
                Arc::new(Configuration::new(
                    config_id.clone(),
                    self.types.clone(),
                    (*self.behaviors).clone(),
                    SystemClock,
                ))
            })
            .clone()
    }

    /// The type registry and behavior registry every Configuration shares
    /// (used by startup replay, which builds its own Configuration before
    /// any connection has arrived).
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn behaviors(&self) -> &BehaviorRegistry {
        &self.behaviors
    }

    pub fn insert_config(&self, config_id: ConfigId, config: Arc<Configuration<SystemClock>>) {
        self.configs.lock().insert(config_id, config);
    }

    pub async fn stop_all(&self) {
        let configs: Vec<Arc<Configuration<SystemClock>>> =
            self.configs.lock().values().cloned().collect();
        for config in configs {
            config.stop_work().await;
        }
    }

    pub fn fboot_path(&self) -> PathBuf {
        self.fboot.lock().path().to_path_buf()
    }
}
