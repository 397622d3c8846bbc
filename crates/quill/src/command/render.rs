use super::{appearance, init_preview, RenderArgs};
use anyhow::{Context, Result};
use clap::Parser;
use quill_config::Config;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Assembles one preview document.
#[derive(Parser, Debug, Clone)]
pub struct Render {
    /// HTML fragment to preview, read from stdin if omitted.
    #[clap(long)]
    pub input: Option<PathBuf>,

    /// Write the document to this file instead of stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,

    #[clap(flatten)]
    pub render_args: RenderArgs,
}

pub(super) fn read_fragment(input: &Path) -> Result<String> {
    std::fs::read_to_string(input)
        .with_context(|| format!("failed to read the content fragment {}", input.display()))
}

pub(super) fn write_document(output: &Path, document: &str) -> Result<()> {
    std::fs::write(output, document)
        .with_context(|| format!("failed to write the document to {}", output.display()))
}

impl Render {
    pub fn run(&self, config: &Config) -> Result<()> {
        let content = match &self.input {
            Some(input) => read_fragment(input)?,
            None => {
                let mut content = String::new();
                std::io::stdin()
                    .read_to_string(&mut content)
                    .context("failed to read the content fragment from stdin")?;
                content
            }
        };

        let preview = init_preview(config);
        let document = preview.render(
            &appearance(config),
            &self.render_args.to_request(content, config),
        );

        match &self.output {
            Some(output) => write_document(output, &document)?,
            None => std::io::stdout().lock().write_all(document.as_bytes())?,
        }

        Ok(())
    }
}
