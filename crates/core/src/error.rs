// SPDX-License-Identifier: MIT

//! Shared error taxonomy.
//!
//! Downstream crates define their own error enums for kinds that are local
//! to a single component (`BehaviorLoadError`, `ProtocolFrameError`,
//! `InvalidFbootState`) and wrap this enum with `#[from]`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown FB type: {0}")]
    UnknownType(String),

    #[error("definition parse error: {0}")]
    DefinitionParseError(String),

    #[error("unknown FB instance: {0}")]
    UnknownFb(String),

    #[error("unknown port {port:?} on FB {fb:?}")]
    UnknownPort { fb: String, port: String },
}
