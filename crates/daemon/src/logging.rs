// SPDX-License-Identifier: MIT

//! Tracing setup: an `EnvFilter` seeded from `-l`, a non-blocking text
//! appender at `resources/error_list.log`, and a JSON sibling at
//! `resources/error_list.jsonl` for machine consumption alongside the
//! human-readable stream.

use crate::cli::LogLevel;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Guards must be held for the process lifetime — dropping them stops the
/// non-blocking writer threads.
pub struct LoggingGuards {
    _text: WorkerGuard,
    _json: WorkerGuard,
}

pub fn init(resources_dir: &Path, level: LogLevel) -> LoggingGuards {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

    let text_appender = tracing_appender::rolling::never(resources_dir, "error_list.log");
    let (text_writer, text_guard) = tracing_appender::non_blocking(text_appender);

    let json_appender = tracing_appender::rolling::never(resources_dir, "error_list.jsonl");
    let (json_writer, json_guard) = tracing_appender::non_blocking(json_appender);

    let text_layer = fmt::layer().with_writer(text_writer).with_ansi(false);
    let json_layer = fmt::layer().json().with_writer(json_writer).with_ansi(false);
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(stderr_layer)
        .init();

    LoggingGuards {
        _text: text_guard,
        _json: json_guard,
    }
}
