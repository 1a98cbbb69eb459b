//! CLI command implementations.

pub mod config;
pub mod rank;
pub mod replay;
pub mod score;
pub mod vote;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand, ValueEnum};
use tierd_ranking::catalog::Category;
use tierd_ranking::ranking::{RankingConfig, RankingStrategy, TieBreak};
use tierd_ranking::vote::VoteType;

/// Strategy flag shared by the ranking commands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Confidence,
    Trending,
}

impl From<StrategyArg> for RankingStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Confidence => RankingStrategy::Confidence,
            StrategyArg::Trending => RankingStrategy::Trending,
        }
    }
}

/// Tie-break flag shared by the ranking commands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TieBreakArg {
    NewestFirst,
    InputOrder,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::NewestFirst => TieBreak::NewestFirst,
            TieBreakArg::InputOrder => TieBreak::InputOrder,
        }
    }
}

/// Overrides of the configured ranking parameters.
#[derive(Args, Debug, Clone)]
pub struct RankingOverrides {
    /// Scoring strategy.
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Order among equal scores.
    #[arg(long, value_enum)]
    pub tie_break: Option<TieBreakArg>,

    /// Weight of the review rating (0-1).
    #[arg(long)]
    pub rating_weight: Option<f64>,
}

impl RankingOverrides {
    /// Apply the overrides on top of the configured parameters.
    pub fn apply(&self, mut config: RankingConfig) -> RankingConfig {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
        if let Some(tie_break) = self.tie_break {
            config.tie_break = tie_break.into();
        }
        if let Some(weight) = self.rating_weight {
            config.rating_weight = weight;
        }
        config
    }
}

/// Arguments for the rank command.
#[derive(Args)]
pub struct RankArgs {
    /// Catalog JSON file (default: config or built-in seed).
    #[arg(long)]
    pub catalog: Option<String>,

    /// Only show products in this category.
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Number of products to show.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub top: usize,

    #[command(flatten)]
    pub ranking: RankingOverrides,
}

/// Vote direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VoteArg {
    Up,
    Down,
    /// Retract the current vote.
    Clear,
}

impl VoteArg {
    pub fn vote_type(self) -> Option<VoteType> {
        match self {
            VoteArg::Up => Some(VoteType::Up),
            VoteArg::Down => Some(VoteType::Down),
            VoteArg::Clear => None,
        }
    }
}

/// Arguments for the vote command.
#[derive(Args)]
pub struct VoteArgs {
    /// Product id or URL slug.
    pub product: String,

    /// Vote direction; repeating the current vote retracts it.
    #[arg(value_enum, default_value = "up")]
    pub direction: VoteArg,

    /// Catalog JSON file (default: config or built-in seed).
    #[arg(long)]
    pub catalog: Option<String>,

    /// Write the updated catalog to this file.
    #[arg(short, long)]
    pub save: Option<String>,

    /// Skip the overwrite confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    #[command(flatten)]
    pub ranking: RankingOverrides,
}

/// Arguments for the replay command.
#[derive(Args)]
pub struct ReplayArgs {
    /// Vote log JSON file.
    pub log: String,

    /// Catalog JSON file (default: config or built-in seed).
    #[arg(long)]
    pub catalog: Option<String>,

    /// Number of products to show after the replay.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub top: usize,

    /// Write the resulting catalog to this file.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Stop at the first rejected vote.
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub ranking: RankingOverrides,
}

/// Arguments for the score command.
#[derive(Args)]
pub struct ScoreArgs {
    /// Number of upvotes.
    pub upvotes: u64,

    /// Number of downvotes.
    pub downvotes: u64,

    /// Hours since the last vote (omit for never voted).
    #[arg(long)]
    pub hours: Option<f64>,

    /// Average review rating (0-5).
    #[arg(long)]
    pub rating: Option<f32>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Config key (e.g., ranking.strategy)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Config key (e.g., ranking.strategy)
        key: String,
        /// Value to set
        value: String,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Validate configuration
    Validate,
}

/// Parse a category name from the command line.
pub fn parse_category(name: &str) -> Result<Category> {
    Category::from_str(name).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        anyhow!("Unknown category '{}' (expected one of: {})", name, known.join(", "))
    })
}
