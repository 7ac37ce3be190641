// SPDX-License-Identifier: MIT

//! Startup replay of the persisted deployment log: rebuilds one
//! Configuration from `data_model.fboot`, then applies `INIT` auto-wiring
//! once the whole script has landed.
//!
//! The grammar scopes the log to "a resources directory",
//! not to any one `config_id` — resolved here (see `host.rs`) by replaying
//! into a single Configuration named [`REPLAY_CONFIG_ID`], recorded as an
//! open-question resolution in `DESIGN.md`.

use crate::dispatch::apply;
use fbrt_behavior::BehaviorRegistry;
use fbrt_core::{ConfigId, SystemClock};
use fbrt_runtime::Configuration;
use fbrt_storage::FbootLog;
use fbrt_typedef::TypeRegistry;
use fbrt_wire::parse_request;
use std::path::Path;

/// The `config_id` a replayed deployment log is loaded into — the log
/// carries no config-scoping of its own, so every replay lands here.
pub const REPLAY_CONFIG_ID: &str = "default";

/// Replays `path` into a fresh Configuration. On any parse or apply
/// failure, logs the error and returns an *empty* Configuration rather
/// than a partially-applied one: abort the replay, start an empty graph,
/// log the error.
pub fn replay(
    path: &Path,
    types: TypeRegistry,
    behaviors: BehaviorRegistry,
) -> Configuration<SystemClock> {
    let entries = match FbootLog::replay(path) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::error!(%error, path = %path.display(), "failed to read deployment log, starting empty");
            Vec::new()
        }
    };

    let config = Configuration::new(
        ConfigId::new(REPLAY_CONFIG_ID),
        types.clone(),
        behaviors.clone(),
        SystemClock,
    );
    if entries.is_empty() {
        return config;
    }

    for entry in &entries {
        let request = match parse_request(&entry.raw_request) {
            Ok(request) => request,
            Err(error) => {
                tracing::error!(
                    seq = entry.seq,
                    start_fb = %entry.start_fb_name,
                    %error,
                    "deployment log entry failed to parse, starting empty"
                );
                return Configuration::new(ConfigId::new(REPLAY_CONFIG_ID), types, behaviors, SystemClock);
            }
        };
        if let Err(error) = apply(&config, &request.command) {
            tracing::error!(
                seq = entry.seq,
                start_fb = %entry.start_fb_name,
                %error,
                "deployment log entry failed to apply, starting empty"
            );
            return Configuration::new(ConfigId::new(REPLAY_CONFIG_ID), types, behaviors, SystemClock);
        }
    }

    config.auto_wire_init();
    config
}
