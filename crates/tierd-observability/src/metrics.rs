//! Vote and ranking-pass metrics.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tierd_ranking::VoterId;

/// Metrics for one session of votes (a CLI run or a replay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingMetrics {
    /// Session ID for correlation.
    pub session_id: String,
    /// Strategy the passes ran under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Votes that changed the catalog.
    pub votes_applied: u64,
    /// Votes rejected with an error.
    pub votes_rejected: u64,
    /// Rejections keyed by reason.
    pub rejections: BTreeMap<String, u64>,
    /// Ranking passes observed.
    pub passes: u64,
    /// Sum of all pass durations (microseconds).
    pub total_pass_us: u64,
    /// Slowest single pass (microseconds).
    pub max_pass_us: u64,
    /// Total session duration (microseconds).
    pub total_duration_us: u64,
}

impl RankingMetrics {
    /// Mean pass duration in microseconds, 0 if no passes ran.
    pub fn avg_pass_us(&self) -> u64 {
        if self.passes == 0 {
            0
        } else {
            self.total_pass_us / self.passes
        }
    }

    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Format as human-readable summary.
    pub fn to_summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Session: {}", self.session_id));
        if let Some(strategy) = &self.strategy {
            lines.push(format!("  Strategy: {}", strategy));
        }
        lines.push(format!("  Votes applied: {}", self.votes_applied));
        lines.push(format!("  Votes rejected: {}", self.votes_rejected));
        for (reason, count) in &self.rejections {
            lines.push(format!("    {}: {}", reason, count));
        }
        lines.push(format!(
            "  Ranking passes: {} (avg {}us, max {}us)",
            self.passes,
            self.avg_pass_us(),
            self.max_pass_us
        ));
        lines.push(format!(
            "  Total: {}us ({:.2}ms)",
            self.total_duration_us,
            self.total_duration_us as f64 / 1000.0
        ));

        lines.join("\n")
    }
}

/// Collector for session metrics.
#[derive(Debug)]
pub struct MetricsRecorder {
    session_id: VoterId,
    strategy: Option<String>,
    start: Instant,
    votes_applied: u64,
    votes_rejected: u64,
    rejections: BTreeMap<String, u64>,
    passes: u64,
    total_pass: Duration,
    max_pass: Duration,
}

impl MetricsRecorder {
    pub fn new(session_id: VoterId) -> Self {
        Self {
            session_id,
            strategy: None,
            start: Instant::now(),
            votes_applied: 0,
            votes_rejected: 0,
            rejections: BTreeMap::new(),
            passes: 0,
            total_pass: Duration::ZERO,
            max_pass: Duration::ZERO,
        }
    }

    pub fn set_strategy(&mut self, strategy: impl Into<String>) {
        self.strategy = Some(strategy.into());
    }

    /// Record a vote that was applied.
    pub fn record_vote_applied(&mut self) {
        self.votes_applied += 1;
    }

    /// Record a rejected vote under a short reason key.
    pub fn record_vote_rejected(&mut self, reason: &str) {
        self.votes_rejected += 1;
        *self.rejections.entry(reason.to_string()).or_insert(0) += 1;
    }

    /// Record one ranking pass.
    pub fn record_pass(&mut self, duration: Duration) {
        self.passes += 1;
        self.total_pass += duration;
        if duration > self.max_pass {
            self.max_pass = duration;
        }
    }

    /// Run `f` and record its duration as a ranking pass.
    pub fn time_pass<T>(&mut self, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.record_pass(start.elapsed());
        out
    }

    /// Finalize and return the metrics.
    pub fn finish(self) -> RankingMetrics {
        let metrics = RankingMetrics {
            session_id: self.session_id.to_string(),
            strategy: self.strategy,
            votes_applied: self.votes_applied,
            votes_rejected: self.votes_rejected,
            rejections: self.rejections,
            passes: self.passes,
            total_pass_us: self.total_pass.as_micros() as u64,
            max_pass_us: self.max_pass.as_micros() as u64,
            total_duration_us: self.start.elapsed().as_micros() as u64,
        };

        tracing::debug!(
            session = %metrics.session_id,
            applied = metrics.votes_applied,
            rejected = metrics.votes_rejected,
            passes = metrics.passes,
            "session metrics finalized"
        );

        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_votes_and_rejections() {
        let mut recorder = MetricsRecorder::new(VoterId::new("voter_a"));
        recorder.set_strategy("confidence");
        recorder.record_vote_applied();
        recorder.record_vote_applied();
        recorder.record_vote_rejected("product_not_found");
        recorder.record_vote_rejected("product_not_found");
        recorder.record_vote_rejected("invalid_transition");

        let metrics = recorder.finish();
        assert_eq!(metrics.votes_applied, 2);
        assert_eq!(metrics.votes_rejected, 3);
        assert_eq!(metrics.rejections["product_not_found"], 2);
        assert_eq!(metrics.rejections["invalid_transition"], 1);
        assert_eq!(metrics.strategy.as_deref(), Some("confidence"));
    }

    #[test]
    fn test_pass_timings() {
        let mut recorder = MetricsRecorder::new(VoterId::new("voter_b"));
        recorder.record_pass(Duration::from_micros(100));
        recorder.record_pass(Duration::from_micros(300));
        let value = recorder.time_pass(|| 7);
        assert_eq!(value, 7);

        let metrics = recorder.finish();
        assert_eq!(metrics.passes, 3);
        assert!(metrics.total_pass_us >= 400);
        assert!(metrics.max_pass_us >= 300);
        assert!(metrics.avg_pass_us() >= 133);
    }

    #[test]
    fn test_empty_session() {
        let metrics = MetricsRecorder::new(VoterId::new("voter_c")).finish();
        assert_eq!(metrics.avg_pass_us(), 0);
        assert!(metrics.to_summary().contains("Votes applied: 0"));

        let parsed: RankingMetrics = serde_json::from_str(&metrics.to_json()).unwrap();
        assert_eq!(parsed.session_id, "voter_c");
        assert!(parsed.strategy.is_none());
    }
}
