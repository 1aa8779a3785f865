//! ProtoFit entry point

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use protofit::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Replay writes responses to stdout, so keep its log output quiet
    let default_filter = match cli.command {
        Commands::Serve(_) => "info,tower_http=debug",
        Commands::Replay(_) | Commands::Config(_) => "warn",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Serve(args) => {
            let config = cli::load_config(cli.config.as_deref())?;
            cli::serve(config, args).await?;
        }
        Commands::Replay(args) => {
            let config = cli::load_config(cli.config.as_deref())?;
            cli::run_replay(config, args)?;
        }
        Commands::Config(command) => {
            cli::run_config(cli.config.as_deref(), command)?;
        }
    }

    Ok(())
}
