//! In-memory ranking store with synchronous subscribers.
//!
//! The store is an ordinary value: create one per session (or per test) and
//! pass it to whatever needs the ranked catalog. It never persists anything;
//! the authoritative counts live in the database and a refetch replaces the
//! list wholesale through [`RankingStore::replace_products`].

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::debug;

use crate::catalog::{Category, Product};
use crate::error::RankingError;
use crate::ids::ProductId;
use crate::ranking::{calculate_rankings, RankingConfig};
use crate::vote::{update_rankings, VoteTransition, VoteType};

/// Callback invoked with the re-ranked products after every change.
pub type Subscriber = Arc<dyn Fn(&[Product]) + Send + Sync>;

struct Registration {
    id: u64,
    callback: Subscriber,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Registration>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle returned by [`RankingStore::subscribe`].
///
/// Dropping the handle leaves the callback registered.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the callback. Returns `false` if it was already removed or the
    /// store is gone.
    pub fn unsubscribe(self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = lock(&registry);
        let before = registry.entries.len();
        registry.entries.retain(|e| e.id != self.id);
        registry.entries.len() != before
    }
}

/// Owns the ranked product list and notifies subscribers when it changes.
pub struct RankingStore {
    products: Vec<Product>,
    config: RankingConfig,
    subscribers: Arc<Mutex<Registry>>,
    clock: fn() -> i64,
}

impl RankingStore {
    /// Create a store and run the first ranking pass.
    pub fn new(products: Vec<Product>, config: RankingConfig) -> Result<Self, RankingError> {
        Self::with_clock(products, config, crate::current_timestamp)
    }

    /// Create a store that reads the time from `clock` (Unix seconds).
    pub fn with_clock(
        products: Vec<Product>,
        config: RankingConfig,
        clock: fn() -> i64,
    ) -> Result<Self, RankingError> {
        config.validate()?;
        let products = calculate_rankings(products, &config, clock());
        Ok(Self {
            products,
            config,
            subscribers: Arc::new(Mutex::new(Registry::default())),
            clock,
        })
    }

    /// Products in rank order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Look a product up by its URL slug.
    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.url_slug == slug)
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// The `n` best-ranked products.
    pub fn top(&self, n: usize) -> &[Product] {
        &self.products[..n.min(self.products.len())]
    }

    /// Products in a category, in overall rank order.
    pub fn by_category(&self, category: Category) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Cast the session user's vote on a product.
    ///
    /// Voting the type already held retracts it. On success the list is
    /// re-ranked and every subscriber is called once; on error nothing
    /// changes and nobody is notified.
    pub fn vote(
        &mut self,
        product_id: &ProductId,
        vote_type: VoteType,
    ) -> Result<VoteTransition, RankingError> {
        let current = self.current_vote(product_id)?;
        self.apply(product_id, VoteTransition::toggle(current, vote_type))
    }

    /// Clear the session user's vote on a product.
    pub fn retract(&mut self, product_id: &ProductId) -> Result<VoteTransition, RankingError> {
        let current = self.current_vote(product_id)?;
        self.apply(product_id, VoteTransition::new(current, None))
    }

    /// Replace the whole list (e.g. after a refetch), re-rank and notify.
    pub fn replace_products(&mut self, products: Vec<Product>) {
        self.products = calculate_rankings(products, &self.config, (self.clock)());
        debug!(products = self.products.len(), "catalog replaced");
        self.notify();
    }

    /// Switch ranking parameters, re-rank and notify.
    pub fn set_config(&mut self, config: RankingConfig) -> Result<(), RankingError> {
        config.validate()?;
        self.config = config;
        let products = std::mem::take(&mut self.products);
        self.products = calculate_rankings(products, &self.config, (self.clock)());
        self.notify();
        Ok(())
    }

    /// Register a callback.
    ///
    /// Registering the same `Arc` twice is a no-op; the returned handle
    /// refers to the existing registration.
    pub fn subscribe(&self, callback: Subscriber) -> Subscription {
        let mut registry = lock(&self.subscribers);

        let id = match registry
            .entries
            .iter()
            .find(|e| Arc::ptr_eq(&e.callback, &callback))
        {
            Some(existing) => existing.id,
            None => {
                let id = registry.next_id;
                registry.next_id += 1;
                registry.entries.push(Registration { id, callback });
                id
            }
        };

        Subscription {
            id,
            registry: Arc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).entries.len()
    }

    fn current_vote(&self, product_id: &ProductId) -> Result<Option<VoteType>, RankingError> {
        self.product(product_id)
            .map(|p| p.user_vote)
            .ok_or_else(|| RankingError::ProductNotFound(product_id.to_string()))
    }

    fn apply(
        &mut self,
        product_id: &ProductId,
        transition: VoteTransition,
    ) -> Result<VoteTransition, RankingError> {
        self.products = update_rankings(
            &self.products,
            product_id,
            transition.next,
            transition.previous,
            &self.config,
            (self.clock)(),
        )?;
        self.notify();
        Ok(transition)
    }

    /// Call every registered subscriber once with the current list.
    ///
    /// The registry lock is released before any callback runs, so callbacks
    /// may subscribe or unsubscribe. A callback removed mid-notification is
    /// skipped.
    fn notify(&self) {
        let snapshot: Vec<(u64, Subscriber)> = lock(&self.subscribers)
            .entries
            .iter()
            .map(|e| (e.id, Arc::clone(&e.callback)))
            .collect();

        for (id, callback) in snapshot {
            if lock(&self.subscribers).contains(id) {
                callback(&self.products);
            }
        }
    }
}

impl fmt::Debug for RankingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankingStore")
            .field("products", &self.products.len())
            .field("config", &self.config)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NOW: i64 = 1_720_000_000;

    fn fixed_clock() -> i64 {
        NOW
    }

    fn store() -> RankingStore {
        let products = vec![
            Product::new("Alpha", "alpha", Category::Mouse)
                .with_id("alpha")
                .with_votes(10, 2),
            Product::new("Bravo", "bravo", Category::Keyboard)
                .with_id("bravo")
                .with_votes(3, 3),
        ];
        RankingStore::with_clock(products, RankingConfig::default(), fixed_clock).unwrap()
    }

    fn counter() -> (Arc<AtomicUsize>, Subscriber) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let callback: Subscriber = Arc::new(move |_: &[Product]| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (calls, callback)
    }

    #[test]
    fn test_new_store_is_ranked() {
        let store = store();
        assert_eq!(store.products()[0].id.as_str(), "alpha");
        assert_eq!(store.products()[0].rank, 1);
        assert_eq!(store.products()[1].rank, 2);
    }

    #[test]
    fn test_vote_then_revote_retracts() {
        let mut store = store();
        let id = ProductId::new("bravo");

        let transition = store.vote(&id, VoteType::Up).unwrap();
        assert_eq!(transition.next, Some(VoteType::Up));
        assert_eq!(store.product(&id).unwrap().upvotes, 4);

        let transition = store.vote(&id, VoteType::Up).unwrap();
        assert_eq!(transition.next, None);
        let bravo = store.product(&id).unwrap();
        assert_eq!(bravo.upvotes, 3);
        assert_eq!(bravo.user_vote, None);
    }

    #[test]
    fn test_retract_without_vote_fails() {
        let mut store = store();
        let err = store.retract(&ProductId::new("alpha")).unwrap_err();
        assert!(matches!(err, RankingError::InvalidTransition { .. }));
    }

    #[test]
    fn test_every_subscriber_called_once_per_vote() {
        let mut store = store();
        let (a_calls, a) = counter();
        let (b_calls, b) = counter();
        let _a = store.subscribe(a);
        let _b = store.subscribe(b);

        store.vote(&ProductId::new("alpha"), VoteType::Down).unwrap();
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_subscription_is_noop() {
        let mut store = store();
        let (calls, callback) = counter();
        let first = store.subscribe(Arc::clone(&callback));
        let second = store.subscribe(callback);

        assert_eq!(first.id(), second.id());
        assert_eq!(store.subscriber_count(), 1);

        store.vote(&ProductId::new("alpha"), VoteType::Up).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribed_callback_not_called() {
        let mut store = store();
        let (calls, callback) = counter();
        let subscription = store.subscribe(callback);

        store.vote(&ProductId::new("alpha"), VoteType::Up).unwrap();
        assert!(subscription.unsubscribe());
        store.vote(&ProductId::new("alpha"), VoteType::Up).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_failed_vote_does_not_notify() {
        let mut store = store();
        let (calls, callback) = counter();
        let _subscription = store.subscribe(callback);
        let before = store.products().to_vec();

        let err = store.vote(&ProductId::new("missing"), VoteType::Up).unwrap_err();
        assert_eq!(err, RankingError::ProductNotFound("missing".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.products(), before.as_slice());
    }

    #[test]
    fn test_callback_may_unsubscribe_itself() {
        let mut store = store();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(AtomicUsize::new(0));

        let slot_in = Arc::clone(&slot);
        let calls_in = Arc::clone(&calls);
        let subscription = store.subscribe(Arc::new(move |_: &[Product]| {
            calls_in.fetch_add(1, Ordering::SeqCst);
            if let Some(sub) = slot_in.lock().unwrap().take() {
                sub.unsubscribe();
            }
        }));
        *slot.lock().unwrap() = Some(subscription);

        store.vote(&ProductId::new("alpha"), VoteType::Up).unwrap();
        store.vote(&ProductId::new("alpha"), VoteType::Up).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_replace_products_notifies() {
        let mut store = store();
        let (calls, callback) = counter();
        let _subscription = store.subscribe(callback);

        store.replace_products(vec![Product::new("Solo", "solo", Category::Chair).with_id("solo")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.products()[0].rank, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_config_rejects_invalid() {
        let mut store = store();
        let bad = RankingConfig::default().with_decay_weight(2.0);
        assert!(store.set_config(bad).is_err());
        assert_eq!(store.config(), &RankingConfig::default());
    }

    #[test]
    fn test_queries() {
        let store = store();
        assert_eq!(store.top(1).len(), 1);
        assert_eq!(store.top(10).len(), 2);
        assert_eq!(store.by_category(Category::Keyboard).len(), 1);
        assert!(store.product_by_slug("bravo").is_some());
    }

    #[test]
    fn test_independent_stores_do_not_share_state() {
        let mut a = store();
        let b = store();
        a.vote(&ProductId::new("alpha"), VoteType::Up).unwrap();
        assert_eq!(a.product(&ProductId::new("alpha")).unwrap().upvotes, 11);
        assert_eq!(b.product(&ProductId::new("alpha")).unwrap().upvotes, 10);
    }
}
