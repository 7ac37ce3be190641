// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `fbrtd`: the function block runtime host.
//!
//! Startup sequence: parse args, init logging, discover FB types, replay
//! the persisted deployment log into a Configuration, bind the deployment
//! TCP port, and serve connections until SIGINT.

mod cli;
mod dispatch;
mod host;
mod listener;
mod logging;
mod replay;

use cli::Cli;
use clap::Parser;
use fbrt_behavior::BehaviorRegistry;
use fbrt_core::ConfigId;
use fbrt_storage::FbootLog;
use fbrt_typedef::TypeRegistry;
use host::Host;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.resources).ok();
    let _logging_guards = logging::init(&cli.resources, cli.log_level);

    if cli.agent {
        tracing::warn!("-g/--agent requested; the self-organizing agent is an external collaborator and is not started by this host");
    }
    if let Some(monitor) = &cli.monitor {
        tracing::warn!(?monitor, "-m/--monitor requested; hardware-telemetry monitoring is an external collaborator and is not started by this host");
    }

    let types = match TypeRegistry::discover(&cli.resources) {
        Ok(types) => types,
        Err(error) => {
            tracing::error!(%error, "failed to discover FB type definitions");
            std::process::exit(2);
        }
    };
    let behaviors = BehaviorRegistry::with_builtins();

    let fboot_path = cli.resources.join("data_model.fboot");
    let fboot = match FbootLog::open(&fboot_path) {
        Ok(log) => log,
        Err(error) => {
            tracing::error!(%error, path = %fboot_path.display(), "failed to open deployment log");
            std::process::exit(2);
        }
    };

    let replayed = replay::replay(&fboot_path, types.clone(), behaviors.clone());
    let host = Arc::new(Host::new(types, behaviors, fboot));
    host.insert_config(ConfigId::new(replay::REPLAY_CONFIG_ID), Arc::new(replayed));

    let bind_addr = format!("{}:{}", cli.address, cli.port);
    let tcp_listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, address = %bind_addr, "failed to bind deployment port");
            std::process::exit(2);
        }
    };
    tracing::info!(address = %bind_addr, opc_port = cli.opc_port, "fbrtd listening");

    let shutdown = CancellationToken::new();
    let serve_shutdown = shutdown.clone();
    let serve_host = host.clone();
    let serve_handle = tokio::spawn(async move {
        listener::serve(tcp_listener, serve_host, serve_shutdown).await;
    });

    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received SIGINT, shutting down"),
        Err(error) => tracing::error!(%error, "failed to listen for SIGINT"),
    }

    shutdown.cancel();
    let _ = serve_handle.await;
    host.stop_all().await;
    std::process::exit(0);
}
