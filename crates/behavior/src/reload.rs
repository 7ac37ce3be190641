// SPDX-License-Identifier: MIT

//! Hot-reload watcher: polls an implementation marker file's mtime (via a
//! debounced `notify::RecommendedWatcher`) and republishes a freshly
//! constructed behavior through a single-slot `tokio::sync::watch` mailbox.

use crate::behavior::{Behavior, BehaviorFactory};
use notify::{RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub type BehaviorHandle = Arc<dyn Behavior>;

/// Spawns the watcher task and returns the receiving end of the handoff
/// mailbox plus the task's `JoinHandle`. The owning FB worker holds the
/// `Receiver` and drains it non-blockingly (`has_changed`/`borrow_and_update`)
/// before each invocation; `cancel` stops the watcher alongside the FB's
/// own stop flag.
pub fn spawn_reload_watcher(
    type_name: String,
    impl_path: PathBuf,
    factory: BehaviorFactory,
    initial: BehaviorHandle,
    cancel: CancellationToken,
) -> (watch::Receiver<BehaviorHandle>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(initial);
    let handle = tokio::spawn(run_watcher(type_name, impl_path, factory, tx, cancel));
    (rx, handle)
}

async fn run_watcher(
    type_name: String,
    impl_path: PathBuf,
    factory: BehaviorFactory,
    tx: watch::Sender<BehaviorHandle>,
    cancel: CancellationToken,
) {
    let (fs_tx, mut fs_rx) = tokio::sync::mpsc::unbounded_channel();
    let mut watcher = match notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if matches!(res, Ok(event) if event.kind.is_modify()) {
            let _ = fs_tx.send(());
        }
    }) {
        Ok(watcher) => watcher,
        Err(error) => {
            tracing::error!(fb_type = %type_name, %error, "failed to start behavior reload watcher");
            return;
        }
    };

    if let Err(error) = watcher.watch(&impl_path, RecursiveMode::NonRecursive) {
        tracing::error!(
            fb_type = %type_name,
            path = %impl_path.display(),
            %error,
            "failed to watch behavior implementation file"
        );
        return;
    }

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            signal = fs_rx.recv() => {
                if signal.is_none() {
                    break;
                }
                let reloaded: BehaviorHandle = Arc::from(factory());
                tracing::info!(fb_type = %type_name, "reloaded behavior implementation");
                if tx.send(reloaded).is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use std::time::Duration;

    #[tokio::test]
    async fn reload_publishes_a_fresh_instance_on_mtime_change() {
        let dir = tempfile::tempdir().unwrap();
        let impl_path = dir.path().join("E_SWITCH.rs");
        std::fs::write(&impl_path, "// v1").unwrap();

        let cancel = CancellationToken::new();
        let initial: BehaviorHandle = Arc::from(builtin::e_switch());
        let (mut rx, _handle) = spawn_reload_watcher(
            "E_SWITCH".to_string(),
            impl_path.clone(),
            builtin::e_switch,
            initial,
            cancel.clone(),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        std::fs::write(&impl_path, "// v2").unwrap();

        let changed = tokio::time::timeout(Duration::from_secs(2), rx.changed()).await;
        assert!(changed.is_ok());

        cancel.cancel();
    }
}
