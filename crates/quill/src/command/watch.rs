use super::render::{read_fragment, write_document};
use super::{appearance, init_preview, RenderArgs};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use quill_config::monitor::ConfigReloaded;
use quill_config::Config;
use quill_core::Preview;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Keeps the preview document up to date.
///
/// A change of the fragment re-renders the document, a change of the config file
/// reloads the syntax theme and the extensions if needed before re-rendering.
#[derive(Parser, Debug, Clone)]
pub struct Watch {
    /// HTML fragment to preview.
    #[clap(long)]
    pub input: PathBuf,

    /// File receiving the document.
    #[clap(long)]
    pub output: PathBuf,

    #[clap(flatten)]
    pub render_args: RenderArgs,
}

/// Returns `false` once the watch loop has gone away.
fn notify_input_changed(sender: &UnboundedSender<()>) -> bool {
    if sender.send(()).is_err() {
        tracing::debug!("Input change receiver dropped");
        return false;
    }
    true
}

/// Notifies `sender` whenever `input` is written.
fn watch_input(input: &Path, sender: UnboundedSender<()>) -> Result<RecommendedWatcher> {
    let input = input
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", input.display()))?;
    let parent = input
        .parent()
        .ok_or_else(|| anyhow!("{input:?} has no parent"))?
        .to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
                    && event.paths.iter().any(|path| path == &input)
                {
                    notify_input_changed(&sender);
                }
            }
            Err(err) => tracing::debug!(?err, "Input watcher error"),
        }
    })?;

    // The parent is watched, editors often save by renaming a new file over the old one.
    watcher.watch(&parent, RecursiveMode::NonRecursive)?;

    Ok(watcher)
}

impl Watch {
    fn render(&self, preview: &Preview, config: &Config) -> Result<()> {
        let content = read_fragment(&self.input)?;
        let document = preview.render(
            &appearance(config),
            &self.render_args.to_request(content, config),
        );
        write_document(&self.output, &document)?;
        tracing::debug!(output = %self.output.display(), "Rendered preview");
        Ok(())
    }

    /// Applies a reloaded config to the preview state.
    fn apply_config(preview: &mut Preview, old: &Config, new: &Config) {
        if new.theme.syntax != old.theme.syntax {
            preview.reload_syntax_theme(&new.theme.syntax);
        }

        if new.extensions.resolve_dir() != old.extensions.resolve_dir() {
            preview.rescan_extensions(&new.extensions.resolve_dir());
        }
    }

    pub async fn run(&self, config: Arc<Config>) -> Result<()> {
        let preview = init_preview(&config);
        self.render(&preview, &config)?;

        let (input_tx, input_rx) = unbounded_channel();
        let _input_watcher = watch_input(&self.input, input_tx)?;

        let (config_tx, config_rx) = unbounded_channel();
        if !quill_config::monitor::watch(config_tx) {
            tracing::info!("Config file is not watched, theme changes require a restart");
        }

        tracing::info!(input = %self.input.display(), output = %self.output.display(), "Watching");

        let shutdown = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(?err, "Failed to listen for ctrl-c");
            }
        };

        self.serve(preview, config, config_rx, input_rx, shutdown).await;

        Ok(())
    }

    /// Re-renders on every input change or config reload until `shutdown` completes.
    async fn serve(
        &self,
        mut preview: Preview,
        mut config: Arc<Config>,
        mut config_rx: UnboundedReceiver<ConfigReloaded>,
        mut input_rx: UnboundedReceiver<()>,
        shutdown: impl Future<Output = ()>,
    ) {
        // Polled across iterations, a signal arriving during a render is not lost.
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                Some(reloaded) = config_rx.recv() => {
                    if let Some(err) = reloaded.error {
                        tracing::warn!(%err, "Malformed config file, using the default config");
                    }
                    let new_config = quill_config::config();
                    Self::apply_config(&mut preview, &config, &new_config);
                    config = new_config;
                }
                Some(()) = input_rx.recv() => {}
                _ = &mut shutdown => break,
            }

            if let Err(err) = self.render(&preview, &config) {
                tracing::error!(?err, "Failed to render preview");
            }
        }
    }
}
