//! Tier'd CLI - rank and vote on the community peripheral catalog.
//!
//! Commands:
//! - `tierd rank` - Rank a catalog and print the leaderboard
//! - `tierd vote` - Cast, switch or retract the session vote on a product
//! - `tierd replay` - Replay a vote log from many voters
//! - `tierd score` - Inspect the score functions for given counts
//! - `tierd config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{ConfigArgs, RankArgs, ReplayArgs, ScoreArgs, VoteArgs};
use config::LoggingConfig;
use tierd_observability::LogFormat;

/// Tier'd CLI - Community rankings for gaming peripherals
#[derive(Parser)]
#[command(name = "tierd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the catalog and print the leaderboard
    Rank(RankArgs),

    /// Vote on a product
    Vote(VoteArgs),

    /// Replay a vote log
    Replay(ReplayArgs),

    /// Show score components for vote counts
    Score(ScoreArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    init_tracing(&ctx.config.logging, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Rank(args) => commands::rank::run(args, &ctx).await,
        Commands::Vote(args) => commands::vote::run(args, &ctx).await,
        Commands::Replay(args) => commands::replay::run(args, &ctx).await,
        Commands::Score(args) => commands::score::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level; `--verbose` forces debug.
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match logging.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Human => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
