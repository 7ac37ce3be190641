// SPDX-License-Identifier: MIT

//! Command-line surface, `clap` derive API matching the rest
//! of this corpus's CLI crates.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fbrtd", about = "Function block runtime host")]
pub struct Cli {
    /// Listen address for the deployment protocol.
    #[arg(short = 'a', long = "address", default_value = "localhost")]
    pub address: String,

    /// Deployment protocol TCP port.
    #[arg(short = 'p', long = "port", default_value_t = 61499)]
    pub port: u16,

    /// OPC-UA port. Accepted and stored; the OPC-UA server itself is an
    /// external collaborator and out of scope for this host.
    #[arg(short = 'u', long = "opc-port", default_value_t = 4840)]
    pub opc_port: u16,

    /// Minimum log level emitted to the error log files.
    #[arg(short = 'l', long = "log-level", default_value = "ERROR")]
    pub log_level: LogLevel,

    /// Enable the self-organizing agent. Accepted and logged; no-op here —
    /// the agent is an external collaborator, out of scope.
    #[arg(short = 'g', long = "agent")]
    pub agent: bool,

    /// Enable hardware-telemetry monitoring with N samples of S seconds.
    /// Accepted and logged; no-op here — monitoring is out of scope.
    #[arg(short = 'm', long = "monitor", num_args = 2, value_names = ["N", "S"])]
    pub monitor: Option<Vec<u32>>,

    /// Root directory containing per-type `.fbt`/implementation pairs and
    /// the `data_model.fboot` deployment log.
    #[arg(long = "resources", default_value = "resources")]
    pub resources: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[clap(rename_all = "UPPER")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}
