//! Vote types and the delta of a vote change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a single vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Up,
    Down,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Up => "up",
            VoteType::Down => "down",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "upvote" | "+1" | "+" => Some(VoteType::Up),
            "down" | "downvote" | "-1" | "-" => Some(VoteType::Down),
            _ => None,
        }
    }

    /// Signed contribution to net votes.
    pub fn value(&self) -> i64 {
        match self {
            VoteType::Up => 1,
            VoteType::Down => -1,
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label for an optional vote ("up", "down" or "none").
pub fn vote_label(vote: Option<VoteType>) -> &'static str {
    vote.map(|v| v.as_str()).unwrap_or("none")
}

/// Signed change to a product's vote counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteDelta {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteDelta {
    /// Change in net votes (upvotes minus downvotes).
    pub fn net(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    /// Apply to a pair of counters.
    ///
    /// Returns `None` when the delta would take a counter below zero, i.e.
    /// when it retracts a vote the counters never recorded.
    pub fn apply(&self, upvotes: u64, downvotes: u64) -> Option<(u64, u64)> {
        Some((
            upvotes.checked_add_signed(self.upvotes)?,
            downvotes.checked_add_signed(self.downvotes)?,
        ))
    }
}

/// A voter's change from one vote state to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteTransition {
    /// The vote being replaced, if any.
    pub previous: Option<VoteType>,
    /// The vote being cast, or `None` to retract.
    pub next: Option<VoteType>,
}

impl VoteTransition {
    pub fn new(previous: Option<VoteType>, next: Option<VoteType>) -> Self {
        Self { previous, next }
    }

    /// Transition for clicking `requested` while holding `current`.
    ///
    /// Clicking the vote already held retracts it.
    pub fn toggle(current: Option<VoteType>, requested: VoteType) -> Self {
        let next = if current == Some(requested) {
            None
        } else {
            Some(requested)
        };
        Self::new(current, next)
    }

    /// Whether the transition leaves the vote unchanged.
    pub fn is_noop(&self) -> bool {
        self.previous == self.next
    }

    /// Net out the previous vote, then add the next one.
    pub fn delta(&self) -> VoteDelta {
        let mut delta = VoteDelta::default();
        match self.previous {
            Some(VoteType::Up) => delta.upvotes -= 1,
            Some(VoteType::Down) => delta.downvotes -= 1,
            None => {}
        }
        match self.next {
            Some(VoteType::Up) => delta.upvotes += 1,
            Some(VoteType::Down) => delta.downvotes += 1,
            None => {}
        }
        delta
    }
}

impl fmt::Display for VoteTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", vote_label(self.previous), vote_label(self.next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use VoteType::{Down, Up};

    #[test]
    fn test_net_deltas() {
        let cases = [
            (None, Some(Up), 1),
            (None, Some(Down), -1),
            (Some(Up), None, -1),
            (Some(Down), None, 1),
            (Some(Up), Some(Down), -2),
            (Some(Down), Some(Up), 2),
        ];
        for (previous, next, expected) in cases {
            let transition = VoteTransition::new(previous, next);
            assert_eq!(transition.delta().net(), expected, "{transition}");
        }
    }

    #[test]
    fn test_switch_moves_one_vote_between_counters() {
        let delta = VoteTransition::new(Some(Up), Some(Down)).delta();
        assert_eq!(delta, VoteDelta { upvotes: -1, downvotes: 1 });
    }

    #[test]
    fn test_toggle() {
        assert_eq!(VoteTransition::toggle(None, Up).next, Some(Up));
        assert_eq!(VoteTransition::toggle(Some(Up), Up).next, None);
        assert_eq!(VoteTransition::toggle(Some(Up), Down).next, Some(Down));
        assert!(!VoteTransition::toggle(Some(Down), Down).is_noop());
        assert!(VoteTransition::new(Some(Up), Some(Up)).is_noop());
    }

    #[test]
    fn test_delta_apply_rejects_underflow() {
        let retract_up = VoteTransition::new(Some(Up), None).delta();
        assert_eq!(retract_up.apply(3, 1), Some((2, 1)));
        assert_eq!(retract_up.apply(0, 1), None);
    }

    #[test]
    fn test_vote_type_parse_and_serde() {
        assert_eq!(VoteType::from_str("UP"), Some(Up));
        assert_eq!(VoteType::from_str("-1"), Some(Down));
        assert_eq!(VoteType::from_str("sideways"), None);
        assert_eq!(serde_json::to_string(&Down).unwrap(), "\"down\"");
    }
}
