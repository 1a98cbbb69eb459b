//! Vote mutation: apply a vote change and re-rank the catalog.

use tracing::{debug, warn};

use crate::catalog::Product;
use crate::error::RankingError;
use crate::ids::ProductId;
use crate::ranking::{calculate_rankings, RankingConfig};
use crate::vote::{vote_label, VoteTransition, VoteType};

/// Apply the session user's vote change to one product and re-rank all of them.
///
/// `previous_vote` is the vote being replaced and `new_vote` the vote being
/// cast (`None` retracts). On success the product records `new_vote` as its
/// `user_vote` and `now` as its last vote time, and every product's rank is
/// recomputed. On error `products` is left as it was.
///
/// # Errors
///
/// - [`RankingError::ProductNotFound`] if no product has `product_id`.
/// - [`RankingError::InvalidTransition`] if the vote does not change, or if
///   the counters do not hold the vote being retracted.
pub fn update_rankings(
    products: &[Product],
    product_id: &ProductId,
    new_vote: Option<VoteType>,
    previous_vote: Option<VoteType>,
    config: &RankingConfig,
    now: i64,
) -> Result<Vec<Product>, RankingError> {
    let transition = VoteTransition::new(previous_vote, new_vote);
    let (mut updated, index) = apply_transition(products, product_id, transition, now)?;
    updated[index].user_vote = new_vote;

    Ok(calculate_rankings(updated, config, now))
}

/// Apply `transition` to the counters of `product_id` in a copy of `products`.
///
/// Returns the copy and the index of the changed product. Ranks are left
/// stale; callers re-run the ranking pass.
pub(crate) fn apply_transition(
    products: &[Product],
    product_id: &ProductId,
    transition: VoteTransition,
    now: i64,
) -> Result<(Vec<Product>, usize), RankingError> {
    let Some(index) = products.iter().position(|p| &p.id == product_id) else {
        warn!(product_id = %product_id, "vote rejected: unknown product");
        return Err(RankingError::ProductNotFound(product_id.to_string()));
    };

    if transition.is_noop() {
        warn!(product_id = %product_id, %transition, "vote rejected: no change");
        return Err(invalid_transition(product_id, transition, "vote is unchanged"));
    }

    let target = &products[index];
    let delta = transition.delta();
    let Some((upvotes, downvotes)) = delta.apply(target.upvotes, target.downvotes) else {
        warn!(
            product_id = %product_id,
            %transition,
            upvotes = target.upvotes,
            downvotes = target.downvotes,
            "vote rejected: retracting a vote the counters do not hold"
        );
        return Err(invalid_transition(
            product_id,
            transition,
            "retracted vote is not counted on the product",
        ));
    };

    let mut updated = products.to_vec();
    let product = &mut updated[index];
    product.upvotes = upvotes;
    product.downvotes = downvotes;
    product.last_vote_at = Some(now);

    debug!(
        product_id = %product_id,
        %transition,
        net_delta = delta.net(),
        upvotes,
        downvotes,
        "vote applied"
    );

    Ok((updated, index))
}

fn invalid_transition(
    product_id: &ProductId,
    transition: VoteTransition,
    reason: &str,
) -> RankingError {
    RankingError::InvalidTransition {
        product_id: product_id.to_string(),
        from: vote_label(transition.previous).to_string(),
        to: vote_label(transition.next).to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use VoteType::{Down, Up};

    const NOW: i64 = 1_720_000_000;

    fn catalog() -> Vec<Product> {
        let products = vec![
            Product::new("Alpha", "alpha", Category::Mouse)
                .with_id("alpha")
                .with_votes(10, 2)
                .with_created_at(NOW - 1_000),
            Product::new("Bravo", "bravo", Category::Keyboard)
                .with_id("bravo")
                .with_votes(9, 2)
                .with_created_at(NOW - 2_000),
        ];
        calculate_rankings(products, &RankingConfig::default(), NOW - 10)
    }

    fn find<'a>(products: &'a [Product], id: &str) -> &'a Product {
        products.iter().find(|p| p.id.as_str() == id).unwrap()
    }

    #[test]
    fn test_upvote_from_none() {
        let before = catalog();
        let id = ProductId::new("bravo");
        let after = update_rankings(
            &before,
            &id,
            Some(Up),
            None,
            &RankingConfig::default(),
            NOW,
        )
        .unwrap();

        let bravo = find(&after, "bravo");
        assert_eq!(bravo.upvotes, 10);
        assert_eq!(bravo.user_vote, Some(Up));
        assert_eq!(bravo.last_vote_at, Some(NOW));

        let alpha = find(&after, "alpha");
        assert_eq!((alpha.upvotes, alpha.downvotes), (10, 2));
    }

    #[test]
    fn test_vote_reranks_whole_list() {
        let before = catalog();
        assert_eq!(find(&before, "alpha").rank, 1);

        let id = ProductId::new("bravo");
        let after = update_rankings(
            &before,
            &id,
            Some(Up),
            None,
            &RankingConfig::default(),
            NOW,
        )
        .unwrap();
        assert_eq!(find(&after, "bravo").rank, 1);
        assert_eq!(find(&after, "alpha").rank, 2);
    }

    #[test]
    fn test_switch_up_to_down() {
        let id = ProductId::new("alpha");
        let config = RankingConfig::default();
        let voted = update_rankings(&catalog(), &id, Some(Up), None, &config, NOW).unwrap();
        let switched = update_rankings(&voted, &id, Some(Down), Some(Up), &config, NOW).unwrap();

        let before = find(&voted, "alpha");
        let after = find(&switched, "alpha");
        assert_eq!(after.votes() - before.votes(), -2);
        assert_eq!(after.user_vote, Some(Down));
    }

    #[test]
    fn test_retract() {
        let id = ProductId::new("alpha");
        let config = RankingConfig::default();
        let voted = update_rankings(&catalog(), &id, Some(Up), None, &config, NOW).unwrap();
        let retracted = update_rankings(&voted, &id, None, Some(Up), &config, NOW).unwrap();

        assert_eq!(find(&retracted, "alpha").upvotes, 10);
        assert_eq!(find(&retracted, "alpha").user_vote, None);
    }

    #[test]
    fn test_unknown_product() {
        let before = catalog();
        let id = ProductId::new("missing");
        let err = update_rankings(
            &before,
            &id,
            Some(Up),
            None,
            &RankingConfig::default(),
            NOW,
        )
        .unwrap_err();
        assert_eq!(err, RankingError::ProductNotFound("missing".to_string()));
    }

    #[test]
    fn test_unchanged_vote_is_rejected() {
        let id = ProductId::new("alpha");
        let err = update_rankings(
            &catalog(),
            &id,
            Some(Up),
            Some(Up),
            &RankingConfig::default(),
            NOW,
        )
        .unwrap_err();
        assert!(matches!(err, RankingError::InvalidTransition { .. }));
    }

    #[test]
    fn test_retracting_uncounted_vote_is_rejected() {
        let products = vec![Product::new("Empty", "empty", Category::Other).with_id("empty")];
        let id = ProductId::new("empty");
        let err = update_rankings(
            &products,
            &id,
            None,
            Some(Down),
            &RankingConfig::default(),
            NOW,
        )
        .unwrap_err();

        match err {
            RankingError::InvalidTransition { from, to, .. } => {
                assert_eq!(from, "down");
                assert_eq!(to, "none");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(products[0].downvotes, 0);
    }
}
