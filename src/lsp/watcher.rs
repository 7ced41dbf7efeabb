//! Options File Watcher
//!
//! Watches the workspace root for changes to `.java-indent.toml` and
//! reloads the server's options when it changes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tower_lsp::lsp_types::MessageType;

use crate::config::options_for_root;
use crate::lsp::backend::Backend;
use crate::lsp::handlers::HandleDiagnostics;
use crate::options::OPTIONS_FILE_NAME;

/// Events sent from the watcher thread to the reload task
#[derive(Debug)]
pub enum WatcherEvent {
    OptionsFileChanged(PathBuf),
    WatcherError(notify::Error),
}

pub fn is_options_file(path: &Path) -> bool {
    path.file_name().and_then(|s| s.to_str()) == Some(OPTIONS_FILE_NAME)
}

/// Start watching `root` and spawn the task that reloads options
pub fn start_watching(backend: Backend, root: PathBuf) -> Result<RecommendedWatcher> {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                if let EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) = event.kind {
                    for path in event.paths {
                        if is_options_file(&path) {
                            let _ = tx.send(WatcherEvent::OptionsFileChanged(path));
                        }
                    }
                }
            }
            Err(e) => {
                let _ = tx.send(WatcherEvent::WatcherError(e));
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )?;
    watcher.watch(&root, RecursiveMode::NonRecursive)?;

    tokio::spawn(reload_task(backend, root, rx));
    Ok(watcher)
}

async fn reload_task(backend: Backend, root: PathBuf, mut rx: mpsc::UnboundedReceiver<WatcherEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            WatcherEvent::OptionsFileChanged(path) => {
                backend
                    .client
                    .log_message(
                        MessageType::INFO,
                        format!("Options file changed: {}", path.display()),
                    )
                    .await;
                match options_for_root(&root) {
                    Ok(options) => {
                        *backend.options.write().await = options;
                        backend.refresh_all().await;
                    }
                    Err(e) => {
                        // keep the previous options until the file is fixed
                        backend
                            .client
                            .log_message(MessageType::ERROR, format!("{e:#}"))
                            .await;
                    }
                }
            }
            WatcherEvent::WatcherError(e) => {
                backend
                    .client
                    .log_message(
                        MessageType::ERROR,
                        format!("Options file watcher error: {}", e),
                    )
                    .await;
            }
        }
    }
}
