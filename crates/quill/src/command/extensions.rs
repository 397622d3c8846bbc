use anyhow::Result;
use clap::Parser;
use quill_config::Config;

/// Lists the extension scripts that would be attached to the preview.
#[derive(Parser, Debug, Clone)]
pub struct Extensions {
    /// Print the list as a JSON array.
    #[clap(long)]
    pub json: bool,
}

impl Extensions {
    pub fn run(&self, config: &Config) -> Result<()> {
        let dir = config.extensions.resolve_dir();
        let scripts = quill_core::discover(&dir);

        if self.json {
            let scripts = scripts.iter().collect::<Vec<_>>();
            println!("{}", serde_json::to_string_pretty(&scripts)?);
        } else if scripts.is_empty() {
            println!("No extension scripts in {}", dir.display());
        } else {
            for script in scripts.iter() {
                println!("{script}");
            }
        }

        Ok(())
    }
}
