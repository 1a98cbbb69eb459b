//! Cross-module properties of scoring, ranking and voting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tierd_ranking::prelude::*;

const NOW: i64 = 1_720_000_000;

fn fixed_clock() -> i64 {
    NOW
}

/// Small deterministic generator so catalogs vary without extra dependencies.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn random_catalog(rng: &mut Lcg, len: usize) -> Vec<Product> {
    (0..len)
        .map(|i| {
            let id = format!("p{i}");
            let mut product = Product::new(id.clone(), id.clone(), Category::Other)
                .with_id(id)
                .with_votes(rng.next(200), rng.next(200))
                .with_created_at(NOW - rng.next(90 * 86_400) as i64);
            if rng.next(2) == 0 {
                product = product.with_last_vote_at(NOW - rng.next(30 * 86_400) as i64);
            }
            product
        })
        .collect()
}

#[test]
fn ranks_are_dense_and_scores_non_increasing() {
    let mut rng = Lcg(7);
    for len in [1, 2, 5, 17, 64] {
        for config in [RankingConfig::default(), RankingConfig::trending()] {
            let ranked = calculate_rankings(random_catalog(&mut rng, len), &config, NOW);

            let mut ranks: Vec<u32> = ranked.iter().map(|p| p.rank).collect();
            ranks.sort_unstable();
            assert_eq!(ranks, (1..=len as u32).collect::<Vec<_>>());

            for pair in ranked.windows(2) {
                assert!(pair[0].score >= pair[1].score);
                assert_eq!(pair[0].rank + 1, pair[1].rank);
            }
        }
    }
}

#[test]
fn ranking_is_deterministic() {
    let catalog = random_catalog(&mut Lcg(42), 30);
    let config = RankingConfig::default();
    assert_eq!(
        calculate_rankings(catalog.clone(), &config, NOW),
        calculate_rankings(catalog, &config, NOW)
    );
}

#[test]
fn empty_catalog_ranks_to_empty() {
    assert!(calculate_rankings(Vec::new(), &RankingConfig::default(), NOW).is_empty());
}

#[test]
fn wilson_example_from_listing() {
    let score = wilson_score(10, 12);
    assert!((score - 0.552).abs() < 0.005, "got {score}");
    assert!(wilson_score(11, 13) > score);
}

#[test]
fn upvote_only_touches_target_product() {
    let catalog = random_catalog(&mut Lcg(3), 10);
    let mut store =
        RankingStore::with_clock(catalog, RankingConfig::default(), fixed_clock).unwrap();
    let before: Vec<(ProductId, u64, u64)> = store
        .products()
        .iter()
        .map(|p| (p.id.clone(), p.upvotes, p.downvotes))
        .collect();

    let target = ProductId::new("p4");
    store.vote(&target, VoteType::Up).unwrap();

    for (id, up, down) in before {
        let product = store.product(&id).unwrap();
        if id == target {
            assert_eq!(product.upvotes, up + 1);
            assert_eq!(product.user_vote, Some(VoteType::Up));
        } else {
            assert_eq!((product.upvotes, product.downvotes), (up, down));
        }
    }
}

#[test]
fn switching_vote_moves_net_by_two() {
    let catalog = random_catalog(&mut Lcg(11), 5);
    let mut store =
        RankingStore::with_clock(catalog, RankingConfig::default(), fixed_clock).unwrap();
    let id = ProductId::new("p2");

    store.vote(&id, VoteType::Up).unwrap();
    let after_up = store.product(&id).unwrap().votes();
    store.vote(&id, VoteType::Down).unwrap();
    let after_down = store.product(&id).unwrap().votes();

    assert_eq!(after_down - after_up, -2);
}

#[test]
fn subscribers_track_votes_until_unsubscribed() {
    let mut store =
        RankingStore::with_clock(seed_catalog(), RankingConfig::default(), fixed_clock).unwrap();
    let id = store.products()[3].id.clone();

    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let subscription = store.subscribe(Arc::new(move |products: &[Product]| {
        assert!(products.iter().all(|p| p.is_ranked()));
        seen.fetch_add(1, Ordering::SeqCst);
    }));

    for _ in 0..4 {
        store.vote(&id, VoteType::Up).unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 4);

    subscription.unsubscribe();
    store.vote(&id, VoteType::Down).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn seed_catalog_votes_survive_round_trip_through_json() {
    let mut store =
        RankingStore::with_clock(seed_catalog(), RankingConfig::default(), fixed_clock).unwrap();
    let id = ProductId::new("audeze-maxwell");
    store.vote(&id, VoteType::Up).unwrap();

    let json = serde_json::to_string(store.products()).unwrap();
    let reloaded: Vec<Product> = serde_json::from_str(&json).unwrap();
    let reloaded_store =
        RankingStore::with_clock(reloaded, RankingConfig::default(), fixed_clock).unwrap();

    assert_eq!(reloaded_store.products(), store.products());
}
