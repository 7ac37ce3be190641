// SPDX-License-Identifier: MIT

use thiserror::Error;

/// `InvalidFbootState`: never converted into `fbrt_core::Error`
/// — replay failure is a startup-time condition the daemon handles by
/// logging and starting an empty graph, not a per-request response.
#[derive(Debug, Error)]
pub enum FbootError {
    #[error("io error on deployment log: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed deployment log line {line_no} (missing ';' separator)")]
    MalformedLine { line_no: usize },
}
