//! The ranking pass: score, sort, assign ranks.

use std::cmp::Ordering;

use tracing::debug;

use crate::catalog::Product;
use crate::ranking::score::{blend_rating, time_decay, trending_score, wilson_score_with_z};
use crate::ranking::{RankingConfig, RankingStrategy, TieBreak};

/// Score every product, sort by descending score and assign dense 1-based ranks.
///
/// Deterministic for a given `now`. Scores that compare equal are ordered
/// by `config.tie_break`; anything still tied keeps its input position.
pub fn calculate_rankings(
    products: Vec<Product>,
    config: &RankingConfig,
    now: i64,
) -> Vec<Product> {
    let mut ranked: Vec<Product> = products
        .into_iter()
        .map(|mut product| {
            product.score = score_product(&product, config, now);
            product
        })
        .collect();

    ranked.sort_by(|a, b| compare_ranked(a, b, config.tie_break));

    for (index, product) in ranked.iter_mut().enumerate() {
        product.rank = index as u32 + 1;
    }

    debug!(
        products = ranked.len(),
        strategy = config.strategy.as_str(),
        "ranking pass complete"
    );

    ranked
}

/// Score a single product under `config` as of `now`.
pub fn score_product(product: &Product, config: &RankingConfig, now: i64) -> f64 {
    match config.strategy {
        RankingStrategy::Confidence => {
            let confidence = wilson_score_with_z(product.upvotes, product.total_votes(), config.z);
            let recency = product
                .hours_since_last_vote(now)
                .map(time_decay)
                .unwrap_or(0.0);
            blend_rating(
                confidence + config.decay_weight * recency,
                product.average_rating,
                config.rating_weight,
            )
        }
        RankingStrategy::Trending => {
            // Unvoted products age from their listing date.
            let hours = product.hours_since_last_vote(now).unwrap_or_else(|| {
                (now.saturating_sub(product.created_at) as f64 / 3600.0).max(0.0)
            });
            trending_score(product.votes(), hours)
        }
    }
}

fn compare_ranked(a: &Product, b: &Product, tie_break: TieBreak) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| match tie_break {
        TieBreak::NewestFirst => b.created_at.cmp(&a.created_at),
        TieBreak::InputOrder => Ordering::Equal,
    })
}
