//! Scoring and ranking.
//!
//! One canonical formula: the Wilson lower bound at the configured z plus
//! `decay_weight` times the time decay since the last vote, optionally
//! blended with the review rating. The trending strategy is offered as a
//! separate ordering, not mixed into the confidence score.

mod config;
mod pass;
mod score;

pub use config::{RankingConfig, RankingStrategy, TieBreak, DEFAULT_DECAY_WEIGHT};
pub use pass::{calculate_rankings, score_product};
pub use score::{
    blend_rating, time_decay, trending_score, wilson_score, wilson_score_with_z, WILSON_Z_95,
};
