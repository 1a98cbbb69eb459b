//! Ranked product type.

use crate::catalog::Category;
use crate::ids::ProductId;
use crate::money::Money;
use crate::vote::VoteType;
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// A peripheral listed in the catalog, with its community ranking state.
///
/// `score` and `rank` are derived: they hold whatever the last ranking pass
/// assigned and are only refreshed by running it again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// URL-friendly slug (unique).
    pub url_slug: String,
    /// Product name.
    pub name: String,
    /// Short description for listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category this product is ranked in.
    #[serde(default)]
    pub category: Category,
    /// List price, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    /// Product image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Community upvotes.
    #[serde(default)]
    pub upvotes: u64,
    /// Community downvotes.
    #[serde(default)]
    pub downvotes: u64,
    /// Score assigned by the last ranking pass.
    #[serde(default)]
    pub score: f64,
    /// 1-based rank assigned by the last ranking pass (0 = not yet ranked).
    #[serde(default)]
    pub rank: u32,
    /// The current session user's vote on this product.
    #[serde(default)]
    pub user_vote: Option<VoteType>,
    /// Unix timestamp of the most recent vote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_vote_at: Option<i64>,
    /// Average review rating on a 0-5 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f32>,
    /// Number of written reviews.
    #[serde(default)]
    pub review_count: u32,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created_at: i64,
}

impl Product {
    /// Create a new unranked product with no votes.
    pub fn new(name: impl Into<String>, url_slug: impl Into<String>, category: Category) -> Self {
        Self {
            id: ProductId::generate(),
            url_slug: url_slug.into(),
            name: name.into(),
            description: None,
            category,
            price: None,
            image_url: None,
            upvotes: 0,
            downvotes: 0,
            score: 0.0,
            rank: 0,
            user_vote: None,
            last_vote_at: None,
            average_rating: None,
            review_count: 0,
            created_at: crate::current_timestamp(),
        }
    }

    /// Use a fixed identifier instead of a generated one.
    pub fn with_id(mut self, id: impl Into<ProductId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Set the vote counters.
    pub fn with_votes(mut self, upvotes: u64, downvotes: u64) -> Self {
        self.upvotes = upvotes;
        self.downvotes = downvotes;
        self
    }

    pub fn with_last_vote_at(mut self, timestamp: i64) -> Self {
        self.last_vote_at = Some(timestamp);
        self
    }

    /// Set the review summary. Ratings are clamped to the 0-5 scale.
    pub fn with_rating(mut self, average_rating: f32, review_count: u32) -> Self {
        self.average_rating = Some(average_rating.clamp(0.0, 5.0));
        self.review_count = review_count;
        self
    }

    pub fn with_created_at(mut self, timestamp: i64) -> Self {
        self.created_at = timestamp;
        self
    }

    /// Net votes (upvotes minus downvotes).
    pub fn votes(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }

    /// Total votes cast.
    pub fn total_votes(&self) -> u64 {
        self.upvotes.saturating_add(self.downvotes)
    }

    /// Share of upvotes among all votes (0 when there are none).
    pub fn upvote_ratio(&self) -> f64 {
        match self.total_votes() {
            0 => 0.0,
            total => self.upvotes as f64 / total as f64,
        }
    }

    /// Hours elapsed between the last vote and `now`, if there was one.
    ///
    /// Timestamps in the future count as zero hours.
    pub fn hours_since_last_vote(&self, now: i64) -> Option<f64> {
        self.last_vote_at
            .map(|at| (now.saturating_sub(at) as f64 / SECONDS_PER_HOUR).max(0.0))
    }

    /// Check if a ranking pass has assigned this product a rank.
    pub fn is_ranked(&self) -> bool {
        self.rank > 0
    }
}
