//! Config file monitor, the source of theme-change events.

use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;

const DEBOUNCE_DELAY: Duration = Duration::from_millis(50);

/// The fallback for `RecommendedWatcher` polling.
const FALLBACK_POLLING_TIMEOUT: Duration = Duration::from_secs(1);

/// Sent after the global config has been reloaded from disk.
#[derive(Debug, Clone)]
pub struct ConfigReloaded {
    /// Parse error of the new config file, the defaults are in effect if any.
    pub error: Option<String>,
}

/// Resolves the path to watch, `None` unless the config file is a regular file.
fn watched_path() -> Option<PathBuf> {
    let config_file = crate::config_file()?;

    // Call `metadata` to resolve symbolic links, this excludes char devices
    // like `/dev/null` and sockets.
    if !config_file
        .metadata()
        .map_or(false, |metadata| metadata.file_type().is_file())
    {
        return None;
    }

    // Events report canonical paths, and a symlinked config is watched at its target.
    config_file.canonicalize().ok()
}

/// Watches the config file in a background thread.
///
/// Every burst of modifications reloads the global config once and notifies `sender`.
/// Returns `false` if the config file can not be watched.
pub fn watch(sender: UnboundedSender<ConfigReloaded>) -> bool {
    let Some(path) = watched_path() else {
        tracing::debug!("No regular config file to watch");
        return false;
    };

    let (tx, rx) = mpsc::channel();
    let mut watcher = match RecommendedWatcher::new(
        tx,
        Config::default().with_poll_interval(FALLBACK_POLLING_TIMEOUT),
    ) {
        Ok(watcher) => watcher,
        Err(err) => {
            tracing::error!(?err, "Unable to watch config file");
            return false;
        }
    };

    let spawned = std::thread::Builder::new()
        .name("config-watcher".into())
        .spawn(move || {
            // Watch the parent directory, editors often replace the file on save.
            let watch_target = path.parent().map(PathBuf::from).unwrap_or_else(|| path.clone());
            if let Err(err) = watcher.watch(&watch_target, RecursiveMode::NonRecursive) {
                tracing::error!(?err, path = %path.display(), "Unable to watch config file");
                return;
            }

            let mut debouncing_deadline: Option<Instant> = None;
            let mut received_events = Vec::new();

            loop {
                let event = match debouncing_deadline.as_ref() {
                    Some(deadline) => {
                        rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                    }
                    None => {
                        let event = rx.recv().map_err(Into::into);
                        debouncing_deadline.replace(Instant::now() + DEBOUNCE_DELAY);
                        event
                    }
                };

                match event {
                    Ok(Ok(event)) => match event.kind {
                        EventKind::Any
                        | EventKind::Create(_)
                        | EventKind::Modify(_)
                        | EventKind::Other => {
                            received_events.push(event);
                        }
                        _ => {}
                    },
                    Err(RecvTimeoutError::Timeout) => {
                        debouncing_deadline = None;

                        if received_events
                            .drain(..)
                            .flat_map(|event| event.paths.into_iter())
                            .any(|modified_path| modified_path == path)
                        {
                            let error = crate::reload_config(path.clone()).map(|e| e.to_string());
                            tracing::info!(?error, "Reloaded config file");
                            if sender.send(ConfigReloaded { error }).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(Err(err)) => {
                        tracing::debug!(?err, "Config watcher error");
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        tracing::debug!("Config watcher channel dropped unexpectedly");
                        break;
                    }
                }
            }
        });

    if let Err(err) = spawned {
        tracing::error!(?err, "Failed to spawn config-watcher thread");
        return false;
    }

    true
}
