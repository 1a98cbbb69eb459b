//! Score inspection.

use anyhow::{bail, Result};
use serde::Serialize;
use tierd_ranking::catalog::{Category, Product};
use tierd_ranking::ranking::{
    score_product, time_decay, wilson_score_with_z, RankingConfig, RankingStrategy,
};

use super::ScoreArgs;
use crate::context::Context;

/// Score components for one set of counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub upvotes: u64,
    pub downvotes: u64,
    pub net: i64,
    pub wilson: f64,
    /// `None` when never voted.
    pub hours: Option<f64>,
    pub decay: f64,
    pub confidence: f64,
    pub trending: f64,
}

/// Compute every score component the ranking pass uses.
///
/// The totals come from scoring a synthetic product, so they match what
/// `calculate_rankings` would assign.
pub fn breakdown(
    upvotes: u64,
    downvotes: u64,
    hours: Option<f64>,
    rating: Option<f32>,
    config: &RankingConfig,
) -> ScoreBreakdown {
    const NOW: i64 = 0;

    let mut product = Product::new("score", "score", Category::Other)
        .with_votes(upvotes, downvotes)
        .with_created_at(NOW);
    if let Some(hours) = hours {
        product = product.with_last_vote_at(NOW - (hours * 3600.0).round() as i64);
    }
    if let Some(rating) = rating {
        product = product.with_rating(rating, 0);
    }

    let confidence_config = RankingConfig {
        strategy: RankingStrategy::Confidence,
        ..*config
    };
    let trending_config = RankingConfig {
        strategy: RankingStrategy::Trending,
        ..*config
    };

    ScoreBreakdown {
        upvotes,
        downvotes,
        net: product.votes(),
        wilson: wilson_score_with_z(upvotes, product.total_votes(), config.z),
        hours,
        decay: hours.map(time_decay).unwrap_or(0.0),
        confidence: score_product(&product, &confidence_config, NOW),
        trending: score_product(&product, &trending_config, NOW),
    }
}

/// Run the score command.
pub async fn run(args: ScoreArgs, ctx: &Context) -> Result<()> {
    if let Some(hours) = args.hours {
        if !hours.is_finite() || hours < 0.0 {
            bail!("--hours must be a non-negative number, got {}", hours);
        }
    }
    if let Some(rating) = args.rating {
        if !(0.0..=5.0).contains(&rating) {
            bail!("--rating must be between 0 and 5, got {}", rating);
        }
    }

    let config = ctx.config.ranking;
    config.validate()?;
    let b = breakdown(args.upvotes, args.downvotes, args.hours, args.rating, &config);

    if ctx.output.is_json() {
        ctx.output.json(&b);
        return Ok(());
    }

    ctx.output.header(&format!("+{} / -{}", b.upvotes, b.downvotes));
    ctx.output.kv("Net votes", &b.net.to_string());
    ctx.output.kv("Wilson lower bound", &format!("{:.4} (z = {})", b.wilson, config.z));
    match b.hours {
        Some(hours) => ctx
            .output
            .kv("Time decay", &format!("{:.4} ({:.1}h since last vote)", b.decay, hours)),
        None => ctx.output.kv("Time decay", "0 (never voted)"),
    }
    ctx.output.kv("Confidence score", &format!("{:.4}", b.confidence));
    ctx.output.kv("Trending score", &format!("{:.4}", b.trending));

    Ok(())
}
