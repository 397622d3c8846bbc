use crate::command;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum RunCmd {
    /// Assemble the preview document of an HTML fragment.
    #[clap(name = "render")]
    Render(command::render::Render),
    /// List the discovered extension scripts.
    #[clap(name = "extensions")]
    Extensions(command::extensions::Extensions),
    /// Re-render the preview whenever the fragment or the config changes.
    #[clap(name = "watch")]
    Watch(command::watch::Watch),
}

/// Quill CLI arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Enable the logging system.
    #[clap(long)]
    pub log: Option<PathBuf>,

    /// Specify the path of the config file.
    #[clap(long)]
    pub config_file: Option<PathBuf>,
}

impl RunCmd {
    pub async fn run(self, args: Args) -> Result<()> {
        let (config, config_err) = quill_config::load_config_on_startup(args.config_file);

        let maybe_log = args.log.or_else(|| {
            std::env::var("QUILL_LOG_PATH")
                .map(PathBuf::from)
                .ok()
                .or_else(|| config.log.log_file.as_ref().map(PathBuf::from))
        });

        // Keep the guard alive until exit so that buffered logs are flushed.
        let _guard = crate::logging::init(maybe_log, &config.log)?;

        if let Some(err) = config_err {
            tracing::warn!(%err, "Malformed config file, using the default config");
        }

        match self {
            Self::Render(render) => render.run(&config),
            Self::Extensions(extensions) => extensions.run(&config),
            Self::Watch(watch) => watch.run(config).await,
        }
    }
}
