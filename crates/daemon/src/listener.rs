// SPDX-License-Identifier: MIT

//! The TCP acceptor and per-connection handler: one
//! short-lived task per connected client, reading and answering frames
//! until the peer closes.

use crate::dispatch::dispatch;
use crate::host::Host;
use fbrt_wire::{
    build_status_response, extract_request_id, parse_request, read_frame, write_response, Command,
};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Accepts connections on `listener` until `shutdown` fires, spawning one
/// task per connection: one worker per connected client, reading until
/// the peer closes or a frame fails to decode.
pub async fn serve(listener: TcpListener, host: Arc<Host>, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        tracing::info!(%addr, "accepted deployment connection");
                        let host = host.clone();
                        let shutdown = shutdown.clone();
                        tokio::spawn(handle_connection(stream, host, shutdown));
                    }
                    Err(error) => {
                        tracing::error!(%error, "failed to accept connection");
                    }
                }
            }
        }
    }
}

/// Reads frames from one connection, dispatching each to its named
/// Configuration (or answering a general request) until the peer closes
/// or the frame fails to decode, at which point the connection is dropped
/// and the error logged. Generic over the stream type so the request/response
/// cycle can be exercised over an in-memory duplex in tests, the same way
/// `fbrt_wire`'s own round-trip test does.
async fn handle_connection<S: AsyncRead + AsyncWrite + Unpin>(
    mut stream: S,
    host: Arc<Host>,
    shutdown: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            _ = shutdown.cancelled() => break,
            frame = read_frame(&mut stream) => frame,
        };
        let frame = match frame {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(error) => {
                tracing::warn!(%error, "dropping connection after frame error");
                break;
            }
        };

        let response = match &frame.config_id {
            None => handle_general_request(&frame.payload),
            Some(config_id) => {
                let config = host.config_for(config_id);
                match parse_request(&frame.payload) {
                    Ok(request) => {
                        // `stop_work` is async; awaited here directly
                        // rather than through the synchronous `dispatch`
                        // helper, which treats `STOP` as a routing no-op.
                        if matches!(request.command, Command::Stop) {
                            config.stop_work().await;
                        }
                        dispatch(config.as_ref(), &request, &frame.payload, &host.fboot)
                    }
                    Err(error) => {
                        tracing::warn!(%error, %config_id, "malformed configuration request");
                        build_status_response("0", Some(&error.to_string()))
                    }
                }
            }
        };

        if let Err(error) = write_response(&mut stream, response.as_bytes()).await {
            tracing::warn!(%error, "failed to write response, dropping connection");
            break;
        }
    }
}

/// General (config-id-less) requests address the server itself rather
/// than a Configuration — creating/destroying Configurations, listing
/// known types, and so on are collaborator-defined and out of scope here
///; this host answers every general request with a bare
/// OK status.
fn handle_general_request(payload: &str) -> String {
    let id = extract_request_id(payload).unwrap_or_else(|| "0".to_string());
    build_status_response(&id, None)
}
