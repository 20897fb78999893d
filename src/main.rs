use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use runnel::app::AppContext;
use runnel::cli::{commands, Cli, Commands};
use runnel::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never land on the TUI screen.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::with_workers(cli.workers)?;

    match cli.subcommand() {
        Commands::Read => {
            let config = Config::load()?;
            commands::read(&ctx, &config)?;
        }
        Commands::Open => {
            let config = Config::load()?;
            commands::open(&ctx, &config)?;
        }
        Commands::Update => {
            commands::update(&ctx).await?;
        }
        Commands::Add { url } => {
            commands::add(&ctx, &url)?;
        }
        Commands::Edit { editor } => {
            commands::edit(&ctx, &editor)?;
        }
        Commands::Import { path } => {
            commands::import_opml(&ctx, &path)?;
        }
        Commands::List => {
            commands::list(&ctx)?;
        }
    }

    Ok(())
}
