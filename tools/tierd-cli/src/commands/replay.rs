//! Vote log replay.

use std::fs;
use std::time::Instant;

use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tierd_observability::{MetricsRecorder, StructuredLogger, VoterId};
use tierd_ranking::catalog::Product;
use tierd_ranking::ranking::{calculate_rankings, RankingConfig};
use tierd_ranking::vote::{vote_label, VoteLedger, VoteType};
use tierd_ranking::{ProductId, RankingError};

use super::ReplayArgs;
use crate::context::Context;
use crate::output::format_timestamp;

/// Voter used for log entries that name none.
const DEFAULT_VOTER: &str = "voter_anonymous";

/// One entry of a vote log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteLogEntry {
    pub product_id: ProductId,
    /// `None` retracts the voter's vote.
    pub vote: Option<VoteType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voter_id: Option<VoterId>,
    /// Unix timestamp of the vote; replay time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<i64>,
}

/// Parse a vote log.
pub fn parse_log(content: &str) -> Result<Vec<VoteLogEntry>> {
    serde_json::from_str(content).context("Failed to parse vote log")
}

/// Short metrics key for a rejected vote.
fn rejection_reason(error: &RankingError) -> &'static str {
    match error {
        RankingError::ProductNotFound(_) => "product_not_found",
        RankingError::InvalidTransition { .. } => "invalid_transition",
        RankingError::InvalidConfig(_) => "invalid_config",
        RankingError::SerializationError(_) => "serialization",
    }
}

/// Outcome of replaying a log against a catalog.
pub struct ReplayOutcome {
    pub products: Vec<Product>,
    pub ledger: VoteLedger,
}

/// Apply every entry in order; rejected entries leave the catalog unchanged.
pub fn replay(
    products: Vec<Product>,
    entries: &[VoteLogEntry],
    strict: bool,
    config: &RankingConfig,
    now: i64,
    metrics: &mut MetricsRecorder,
    logger: &StructuredLogger,
    mut on_entry: impl FnMut(),
) -> Result<ReplayOutcome> {
    let mut ledger = VoteLedger::new();
    let mut products = metrics.time_pass(|| calculate_rankings(products, config, now));
    let default_voter = VoterId::new(DEFAULT_VOTER);

    for (index, entry) in entries.iter().enumerate() {
        let voter = entry.voter_id.as_ref().unwrap_or(&default_voter);
        let at = entry.at.unwrap_or(now);

        let started = Instant::now();
        let result = ledger.cast(&products, voter, &entry.product_id, entry.vote, config, at);

        match result {
            Ok(updated) => {
                // Rejected casts return before re-ranking, so only these count as passes.
                metrics.record_pass(started.elapsed());
                products = updated;
                metrics.record_vote_applied();
                logger
                    .debug_builder("vote applied")
                    .field("voter_id", voter.as_str())
                    .field("product_id", entry.product_id.as_str())
                    .field("vote", vote_label(entry.vote))
                    .emit();
            }
            Err(e) => {
                metrics.record_vote_rejected(rejection_reason(&e));
                logger
                    .warn_builder("vote rejected")
                    .field_u64("entry", index as u64)
                    .field("voter_id", voter.as_str())
                    .field("product_id", entry.product_id.as_str())
                    .field("reason", e.to_string())
                    .emit();
                if strict {
                    bail!("Entry {} rejected: {}", index, e);
                }
            }
        }

        on_entry();
    }

    Ok(ReplayOutcome { products, ledger })
}

/// Run the replay command.
pub async fn run(args: ReplayArgs, ctx: &Context) -> Result<()> {
    let config = args.ranking.apply(ctx.config.ranking);
    config.validate()?;

    let log_path = ctx.resolve_path(&args.log);
    let content = fs::read_to_string(&log_path)
        .with_context(|| format!("Failed to read vote log: {}", log_path.display()))?;
    let entries = parse_log(&content)?;
    let products = ctx.load_catalog(args.catalog.as_deref())?;

    let session = VoterId::generate();
    let logger = StructuredLogger::new(session.clone())
        .with_component("replay")
        .with_min_level(ctx.config.logging.level)
        .with_format(ctx.config.logging.format);
    let mut metrics = MetricsRecorder::new(session);
    metrics.set_strategy(config.strategy.as_str());

    let now = Utc::now().timestamp();
    ctx.output.header(&format!("Replaying {} votes", entries.len()));

    let pb = ctx.output.progress(entries.len() as u64, "votes");
    let outcome = replay(
        products,
        &entries,
        args.strict,
        &config,
        now,
        &mut metrics,
        &logger,
        || pb.inc(1),
    );
    pb.finish_and_clear();
    let outcome = outcome?;
    let metrics = metrics.finish();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "metrics": metrics,
            "active_votes": outcome.ledger.len(),
            "top": outcome.products.iter().take(args.top).collect::<Vec<_>>(),
        }));
    } else {
        if metrics.votes_rejected > 0 {
            ctx.output.warn(&format!(
                "{} of {} votes rejected",
                metrics.votes_rejected,
                entries.len()
            ));
        } else {
            ctx.output.success(&format!("Replayed {} votes", metrics.votes_applied));
        }

        let top: Vec<&Product> = outcome.products.iter().take(args.top).collect();
        super::rank::print_table(ctx, &top, &config, now);

        ctx.output.info("");
        for line in metrics.to_summary().lines() {
            ctx.output.info(line);
        }
        ctx.output.kv("Active votes", &outcome.ledger.len().to_string());
        let last_vote = outcome.products.iter().filter_map(|p| p.last_vote_at).max();
        ctx.output.kv("Last vote", &format_timestamp(last_vote));
    }

    if let Some(path) = args.output.as_deref() {
        let path = ctx.resolve_path(path);
        ctx.save_catalog(&path, &outcome.products)?;
        ctx.output.success(&format!("Saved catalog: {}", path.display()));
    }

    Ok(())
}
