// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Fatal: the initial load of a behavior failed. The runtime aborts
/// deployment of the owning FB when this is returned. Never
/// converted into `fbrt_core::Error` — a `BehaviorLoadError` is a process
/// abort, not a per-request failure status.
#[derive(Debug, Error)]
pub enum BehaviorLoadError {
    #[error("no behavior registered for type {0:?}")]
    UnknownType(String),
}
