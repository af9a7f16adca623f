use anyhow::Result;
use clap::Parser;

use unreal_bridge::cli::{self, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    // Initialize logging; stderr so `send` output stays pipeable
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Send(args) => cli::send::run(args, cli.config.as_deref()).await,
        Commands::Tools(args) => cli::tools::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => cli::config::run(args, cli.config.as_deref()).await,
    }
}
