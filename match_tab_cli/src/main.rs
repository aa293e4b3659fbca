use clap::Parser;
use match_tab_cli::{read_config, Command};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "match-tab", about = "Pairings and standings for Swiss, FFA and team tournaments")]
struct Cli {
    /// Tournament snapshot to read and update. Defaults to the configured path.
    #[arg(long, short)]
    snapshot: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = read_config();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging_config));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    let snapshot_path = cli
        .snapshot
        .unwrap_or_else(|| config.default_snapshot_path.clone());

    cli.command.run(&snapshot_path, &config).await
}
