//! Foliage CLI - load weather, precompute atlases and inspect species timelines.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "foliage-cli",
    version,
    about = "Street tree foliage phenology toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: foliage_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("[Foliage Debug] cli: starting");
    foliage_cmd::run(cli.command)
}
