//! Leaderboard display.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use tierd_ranking::catalog::Product;
use tierd_ranking::ranking::{calculate_rankings, RankingConfig};

use super::{parse_category, RankArgs};
use crate::context::Context;
use crate::output::{format_age, truncate, vote_badge};

/// Leaderboard row for JSON output.
#[derive(Debug, Serialize)]
struct RankRow<'a> {
    rank: u32,
    id: &'a str,
    name: &'a str,
    category: &'a str,
    upvotes: u64,
    downvotes: u64,
    score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_vote: Option<&'static str>,
}

/// Run the rank command.
pub async fn run(args: RankArgs, ctx: &Context) -> Result<()> {
    let config = args.ranking.apply(ctx.config.ranking);
    config.validate()?;

    let category = args.category.as_deref().map(parse_category).transpose()?;
    let products = ctx.load_catalog(args.catalog.as_deref())?;
    let now = Utc::now().timestamp();

    let ranked = calculate_rankings(products, &config, now);
    let shown: Vec<&Product> = ranked
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .take(args.top)
        .collect();

    if ctx.output.is_json() {
        let rows: Vec<RankRow<'_>> = shown
            .iter()
            .map(|p| RankRow {
                rank: p.rank,
                id: p.id.as_str(),
                name: &p.name,
                category: p.category.as_str(),
                upvotes: p.upvotes,
                downvotes: p.downvotes,
                score: p.score,
                user_vote: p.user_vote.map(|v| v.as_str()),
            })
            .collect();
        ctx.output.json(&rows);
        return Ok(());
    }

    let title = match category {
        Some(c) => format!("{} - {}", config.strategy.display_name(), c.display_name()),
        None => config.strategy.display_name().to_string(),
    };
    ctx.output.header(&title);

    if shown.is_empty() {
        ctx.output.info("No products to rank");
        return Ok(());
    }

    print_table(ctx, &shown, &config, now);

    ctx.output.info("");
    ctx.output.kv("Products", &ranked.len().to_string());
    ctx.output.kv("Tie-break", config.tie_break.as_str());

    Ok(())
}

/// Print ranked products as a table.
pub fn print_table(ctx: &Context, products: &[&Product], config: &RankingConfig, now: i64) {
    let widths = [4, 32, 11, 6, 6, 8, 9, 6];
    ctx.output.table_row(
        &["#", "PRODUCT", "CATEGORY", "UP", "DOWN", "SCORE", "ACTIVITY", "VOTE"],
        &widths,
    );
    ctx.output.table_row(
        &["----", "-------", "--------", "--", "----", "-----", "--------", "----"],
        &widths,
    );

    for product in products {
        let activity = product
            .hours_since_last_vote(now)
            .map(format_age)
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[
                &product.rank.to_string(),
                &truncate(&product.name, 32),
                product.category.as_str(),
                &product.upvotes.to_string(),
                &product.downvotes.to_string(),
                &format!("{:.4}", product.score),
                &activity,
                &vote_badge(product.user_vote),
            ],
            &widths,
        );
    }

    ctx.output.debug(&format!(
        "z={} decay_weight={} rating_weight={}",
        config.z, config.decay_weight, config.rating_weight
    ));
}
