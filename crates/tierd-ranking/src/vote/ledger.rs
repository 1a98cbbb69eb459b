//! Active votes of many voters.

use std::collections::HashMap;

use crate::catalog::Product;
use crate::error::RankingError;
use crate::ids::{ProductId, VoterId};
use crate::ranking::{calculate_rankings, RankingConfig};
use crate::vote::mutation::apply_transition;
use crate::vote::{VoteTransition, VoteType};

/// Tracks at most one active vote per (voter, product) pair.
///
/// Used when replaying a log of votes from many voters: each cast nets out
/// that voter's previous vote on the product. Unlike
/// [`update_rankings`](crate::vote::update_rankings), the products'
/// `user_vote` field is left alone since it belongs to the session user.
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    votes: HashMap<(VoterId, ProductId), VoteType>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The voter's active vote on a product.
    pub fn vote_of(&self, voter: &VoterId, product_id: &ProductId) -> Option<VoteType> {
        self.votes
            .get(&(voter.clone(), product_id.clone()))
            .copied()
    }

    /// Set the voter's vote on a product (`None` retracts) and re-rank.
    ///
    /// The ledger only changes when the vote applies cleanly.
    pub fn cast(
        &mut self,
        products: &[Product],
        voter: &VoterId,
        product_id: &ProductId,
        vote: Option<VoteType>,
        config: &RankingConfig,
        now: i64,
    ) -> Result<Vec<Product>, RankingError> {
        let transition = VoteTransition::new(self.vote_of(voter, product_id), vote);
        let (updated, _) = apply_transition(products, product_id, transition, now)?;

        let key = (voter.clone(), product_id.clone());
        match vote {
            Some(vote) => {
                self.votes.insert(key, vote);
            }
            None => {
                self.votes.remove(&key);
            }
        }

        Ok(calculate_rankings(updated, config, now))
    }

    /// Number of active votes.
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Active votes per product as (upvotes, downvotes).
    pub fn tally(&self) -> HashMap<ProductId, (u64, u64)> {
        let mut tally: HashMap<ProductId, (u64, u64)> = HashMap::new();
        for ((_, product_id), vote) in &self.votes {
            let entry = tally.entry(product_id.clone()).or_default();
            match vote {
                VoteType::Up => entry.0 += 1,
                VoteType::Down => entry.1 += 1,
            }
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    const NOW: i64 = 1_720_000_000;

    fn products() -> Vec<Product> {
        vec![Product::new("Pad", "pad", Category::Mousepad).with_id("pad")]
    }

    #[test]
    fn test_one_vote_per_voter() {
        let mut ledger = VoteLedger::new();
        let config = RankingConfig::default();
        let pad = ProductId::new("pad");
        let alice = VoterId::new("alice");
        let bob = VoterId::new("bob");

        let p = ledger.cast(&products(), &alice, &pad, Some(VoteType::Up), &config, NOW).unwrap();
        let p = ledger.cast(&p, &bob, &pad, Some(VoteType::Up), &config, NOW).unwrap();
        let p = ledger.cast(&p, &alice, &pad, Some(VoteType::Down), &config, NOW).unwrap();

        assert_eq!((p[0].upvotes, p[0].downvotes), (1, 1));
        assert_eq!(p[0].user_vote, None);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.tally().get(&pad), Some(&(1, 1)));
    }

    #[test]
    fn test_repeat_vote_rejected_and_ledger_unchanged() {
        let mut ledger = VoteLedger::new();
        let config = RankingConfig::default();
        let pad = ProductId::new("pad");
        let alice = VoterId::new("alice");

        let p = ledger.cast(&products(), &alice, &pad, Some(VoteType::Up), &config, NOW).unwrap();
        assert!(ledger.cast(&p, &alice, &pad, Some(VoteType::Up), &config, NOW).is_err());
        assert_eq!(ledger.vote_of(&alice, &pad), Some(VoteType::Up));
    }

    #[test]
    fn test_retract_removes_entry() {
        let mut ledger = VoteLedger::new();
        let config = RankingConfig::default();
        let pad = ProductId::new("pad");
        let alice = VoterId::new("alice");

        let p = ledger.cast(&products(), &alice, &pad, Some(VoteType::Down), &config, NOW).unwrap();
        let p = ledger.cast(&p, &alice, &pad, None, &config, NOW).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(p[0].downvotes, 0);
    }
}
