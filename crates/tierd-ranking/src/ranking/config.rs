//! Ranking configuration.

use crate::error::RankingError;
use crate::ranking::score::WILSON_Z_95;
use serde::{Deserialize, Serialize};

/// Weight of the recency bonus added to the Wilson score.
pub const DEFAULT_DECAY_WEIGHT: f64 = 0.1;

/// How products are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RankingStrategy {
    /// Wilson lower bound plus a weighted recency bonus.
    #[default]
    Confidence,
    /// Net votes weighted by recency of activity.
    Trending,
}

impl RankingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingStrategy::Confidence => "confidence",
            RankingStrategy::Trending => "trending",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "confidence" | "best" | "wilson" => Some(RankingStrategy::Confidence),
            "trending" | "hot" => Some(RankingStrategy::Trending),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RankingStrategy::Confidence => "Top Rated",
            RankingStrategy::Trending => "Trending",
        }
    }
}

/// Order among products with equal scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// More recently listed products first.
    #[default]
    NewestFirst,
    /// Keep the order the products were given in.
    InputOrder,
}

impl TieBreak {
    pub fn as_str(&self) -> &'static str {
        match self {
            TieBreak::NewestFirst => "newest_first",
            TieBreak::InputOrder => "input_order",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "newest_first" | "newest" => Some(TieBreak::NewestFirst),
            "input_order" | "stable" => Some(TieBreak::InputOrder),
            _ => None,
        }
    }
}

/// Parameters of the ranking pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Scoring strategy.
    #[serde(default)]
    pub strategy: RankingStrategy,

    /// Confidence parameter of the Wilson interval.
    #[serde(default = "default_z")]
    pub z: f64,

    /// Weight of the time-decay bonus (0-1).
    #[serde(default = "default_decay_weight")]
    pub decay_weight: f64,

    /// Weight of the review rating against the vote score (0-1, 0 disables).
    #[serde(default)]
    pub rating_weight: f64,

    /// Tie-break among equal scores.
    #[serde(default)]
    pub tie_break: TieBreak,
}

fn default_z() -> f64 {
    WILSON_Z_95
}

fn default_decay_weight() -> f64 {
    DEFAULT_DECAY_WEIGHT
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            strategy: RankingStrategy::default(),
            z: default_z(),
            decay_weight: default_decay_weight(),
            rating_weight: 0.0,
            tie_break: TieBreak::default(),
        }
    }
}

impl RankingConfig {
    /// Trending ranking with the default parameters.
    pub fn trending() -> Self {
        Self {
            strategy: RankingStrategy::Trending,
            ..Self::default()
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_decay_weight(mut self, weight: f64) -> Self {
        self.decay_weight = weight;
        self
    }

    pub fn with_rating_weight(mut self, weight: f64) -> Self {
        self.rating_weight = weight;
        self
    }

    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<(), RankingError> {
        if !self.z.is_finite() || self.z <= 0.0 {
            return Err(RankingError::InvalidConfig(format!(
                "z must be a positive number, got {}",
                self.z
            )));
        }
        check_weight("decay_weight", self.decay_weight)?;
        check_weight("rating_weight", self.rating_weight)?;
        Ok(())
    }
}

fn check_weight(name: &str, value: f64) -> Result<(), RankingError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RankingError::InvalidConfig(format!(
            "{name} must be between 0 and 1, got {value}"
        )))
    }
}
