//! Ranking core for Tier'd, a community ranking of gaming peripherals.
//!
//! This crate provides the pieces that turn raw community votes into a
//! ranked catalog:
//!
//! - **Catalog**: Products, categories, prices and the built-in seed list
//! - **Ranking**: Wilson lower bound, time decay, trending score and the ranking pass
//! - **Vote**: Vote transitions and the vote mutation that re-ranks the catalog
//! - **Store**: An in-memory ranking store with synchronous subscribers
//!
//! # Example
//!
//! ```rust
//! use tierd_ranking::prelude::*;
//!
//! let mut store = RankingStore::new(seed_catalog(), RankingConfig::default())?;
//! let id = store.products()[0].id.clone();
//!
//! let _subscription = store.subscribe(std::sync::Arc::new(|products: &[Product]| {
//!     println!("{} products re-ranked", products.len());
//! }));
//!
//! store.vote(&id, VoteType::Up)?;
//! assert_eq!(store.product(&id).map(|p| p.user_vote), Some(Some(VoteType::Up)));
//! # Ok::<(), tierd_ranking::RankingError>(())
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod ranking;
pub mod store;
pub mod vote;

pub use error::RankingError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::RankingError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{seed_catalog, Category, Product};

    // Ranking
    pub use crate::ranking::{
        calculate_rankings, time_decay, trending_score, wilson_score, RankingConfig,
        RankingStrategy, TieBreak,
    };

    // Vote
    pub use crate::vote::{update_rankings, VoteDelta, VoteLedger, VoteTransition, VoteType};

    // Store
    pub use crate::store::{RankingStore, Subscriber, Subscription};
}

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
