//! Session voting.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use dialoguer::Confirm;
use serde_json::json;
use tierd_observability::{StructuredLogger, VoterId};
use tierd_ranking::catalog::Product;
use tierd_ranking::store::RankingStore;
use tierd_ranking::ProductId;

use super::{VoteArg, VoteArgs};
use crate::context::Context;
use crate::output::vote_badge;

/// Run the vote command.
pub async fn run(args: VoteArgs, ctx: &Context) -> Result<()> {
    let config = args.ranking.apply(ctx.config.ranking);
    let products = ctx.load_catalog(args.catalog.as_deref())?;
    let mut store = RankingStore::new(products, config)?;

    let product_id = resolve_product(&store, &args.product)?;
    let before = store
        .product(&product_id)
        .map(|p| p.rank)
        .unwrap_or_default();

    let logger = StructuredLogger::new(VoterId::generate())
        .with_component("vote")
        .with_min_level(ctx.config.logging.level)
        .with_format(ctx.config.logging.format);

    // Capture the product's new rank from the notification.
    let observed = Arc::new(Mutex::new(None::<u32>));
    let subscription = {
        let logger = logger.clone();
        let observed = Arc::clone(&observed);
        let product_id = product_id.clone();
        store.subscribe(Arc::new(move |products: &[Product]| {
            let rank = products
                .iter()
                .find(|p| p.id == product_id)
                .map(|p| p.rank);
            if let Ok(mut slot) = observed.lock() {
                *slot = rank;
            }
            logger
                .debug_builder("catalog re-ranked")
                .field("product_id", product_id.as_str())
                .field_u64("products", products.len() as u64)
                .emit();
        }))
    };

    let result = match args.direction.vote_type() {
        Some(vote_type) => store.vote(&product_id, vote_type),
        None => store.retract(&product_id),
    };
    subscription.unsubscribe();

    let transition = match result {
        Ok(transition) => transition,
        Err(e) => {
            logger
                .warn_builder("vote rejected")
                .field("product_id", product_id.as_str())
                .field("reason", e.to_string())
                .emit();
            return Err(e.into());
        }
    };

    let product = store
        .product(&product_id)
        .ok_or_else(|| anyhow!("Product disappeared after voting: {}", product_id))?;
    let after = observed
        .lock()
        .ok()
        .and_then(|slot| *slot)
        .unwrap_or(product.rank);

    logger
        .info_builder("vote applied")
        .field("product_id", product_id.as_str())
        .field("transition", transition.to_string())
        .field_i64("net_delta", transition.delta().net())
        .field_f64("score", product.score)
        .field_u64("rank", after as u64)
        .emit();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "product_id": product.id,
            "previous": transition.previous,
            "vote": transition.next,
            "upvotes": product.upvotes,
            "downvotes": product.downvotes,
            "score": product.score,
            "previous_rank": before,
            "rank": after,
        }));
    } else {
        let verb = match (args.direction, transition.next) {
            (VoteArg::Clear, _) | (_, None) => "Retracted vote on",
            (_, Some(_)) => "Voted on",
        };
        ctx.output.success(&format!("{} {}", verb, product.name));
        ctx.output.kv("Vote", &vote_badge(transition.next));
        ctx.output.kv("Votes", &format!("+{} / -{}", product.upvotes, product.downvotes));
        ctx.output.kv("Score", &format!("{:.4}", product.score));
        ctx.output.kv("Rank", &rank_change(before, after));
    }

    if let Some(path) = args.save.as_deref() {
        let path = ctx.resolve_path(path);
        if path.exists() && !args.yes {
            if ctx.output.is_json() {
                bail!(
                    "Refusing to overwrite {} without --yes",
                    path.display()
                );
            }
            let confirmed = Confirm::new()
                .with_prompt(format!("Overwrite {}?", path.display()))
                .default(false)
                .interact()?;
            if !confirmed {
                ctx.output.info("Catalog not saved");
                return Ok(());
            }
        }

        ctx.save_catalog(&path, store.products())?;
        ctx.output.success(&format!("Saved catalog: {}", path.display()));
    }

    Ok(())
}

/// Find a product by id, then by URL slug.
fn resolve_product(store: &RankingStore, key: &str) -> Result<ProductId> {
    let id = ProductId::new(key);
    if store.product(&id).is_some() {
        return Ok(id);
    }
    store
        .product_by_slug(key)
        .map(|p| p.id.clone())
        .ok_or_else(|| anyhow!("Product not found: {}", key))
}

fn rank_change(before: u32, after: u32) -> String {
    match before.cmp(&after) {
        std::cmp::Ordering::Greater => format!("#{} (up from #{})", after, before),
        std::cmp::Ordering::Less => format!("#{} (down from #{})", after, before),
        std::cmp::Ordering::Equal => format!("#{}", after),
    }
}
