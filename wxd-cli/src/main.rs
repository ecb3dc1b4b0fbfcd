//! wxd - weather ingestion and snapshot tool backed by World Weather Online.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wxd", version, about = "Weather dashboard data pipeline")]
struct Cli {
    /// TOML settings file; built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: wxd_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Using config {:?}", cli.config);
    wxd_cmd::run(cli.config.as_deref(), cli.command).await
}
