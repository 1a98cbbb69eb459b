//! Observability for the Tier'd ranking core.
//!
//! This crate provides:
//! - `StructuredLogger` - JSON or human log lines carrying the voter session
//! - `MetricsRecorder` / `RankingMetrics` - vote and ranking-pass counters and timings

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;

// Sessions are identified by voter id.
pub use tierd_ranking::VoterId;
