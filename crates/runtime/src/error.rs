// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Fatal to a single FB worker. Logged and the worker
/// stops; never converted into `fbrt_core::Error` — a worker fault is not a
/// response to any particular client request.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("behavior returned {got} outputs, expected {expected}")]
    ArityError { expected: usize, got: usize },

    #[error("behavior returned no outputs (internal fault)")]
    NullOutput,
}

/// The typed result every `Configuration` mutating operation returns.
/// Wraps the per-request kinds from `fbrt_core::Error`
/// (`UnknownType`, `DefinitionParseError`, `UnknownFb`, `UnknownPort`
/// already cover the client-visible failures) alongside the load-time
/// failure a `create_fb` call can additionally surface, and the
/// duplicate-name rejection `create_fb` raises instead of overwriting.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Core(#[from] fbrt_core::Error),

    #[error(transparent)]
    BehaviorLoad(#[from] fbrt_behavior::BehaviorLoadError),

    #[error("malformed port reference {0:?} (expected fb.port)")]
    MalformedPortRef(String),

    #[error("FB {0:?} already exists in this configuration")]
    DuplicateFb(String),
}
