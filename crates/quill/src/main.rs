mod app;
mod command;
mod logging;

use app::{Args, RunCmd};
use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "quill", version)]
pub struct Quill {
    #[clap(flatten)]
    pub args: Args,

    #[clap(subcommand)]
    pub cmd: RunCmd,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let quill = Quill::parse();

    if let Err(e) = quill.cmd.run(quill.args).await {
        eprintln!("error: {e:?}");
        std::process::exit(1);
    }

    Ok(())
}
