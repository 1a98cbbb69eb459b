//! Votes and the vote mutation.

mod ledger;
mod mutation;
mod transition;

pub use ledger::VoteLedger;
pub use mutation::update_rankings;
pub use transition::{vote_label, VoteDelta, VoteTransition, VoteType};
