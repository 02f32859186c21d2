//! Vote recording and the per-instance tally.
//!
//! The tally counts users, not ballots: a user who changes their vote is
//! moved from the old bucket to the new one.

use crate::error::Error;
use crate::prompt::Prompt;
use crate::state::{AggregateState, UserState};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What a successful vote changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteChange {
    pub old_vote: Option<usize>,
    pub new_vote: usize,
}

impl VoteChange {
    pub fn is_revote(&self) -> bool {
        self.old_vote.is_some()
    }
}

/// Records a user's vote and keeps the aggregate in step.
pub struct VoteAggregator;

impl VoteAggregator {
    /// Apply `new_vote` for the user behind `state`.
    ///
    /// `new_vote` comes from the client and is checked against `prompt`'s
    /// scale before anything is touched; a rejected vote leaves both records
    /// unchanged.
    pub fn cast_vote(
        prompt: &Prompt,
        state: &mut UserState,
        aggregate: &mut AggregateState,
        new_vote: i64,
    ) -> Result<VoteChange> {
        let option_count = prompt.option_count();
        let index = usize::try_from(new_vote)
            .ok()
            .filter(|i| *i < option_count)
            .ok_or(Error::InvalidVote {
                index: new_vote,
                option_count,
            })?;

        let tally = &mut aggregate.vote_tally;
        if tally.is_empty() {
            tally.resize(option_count, 0);
        }
        // Users pinned to a longer scale than the first voter's.
        if tally.len() <= index {
            tally.resize(index + 1, 0);
        }

        let old_vote = state.current_vote;
        if let Some(old) = old_vote {
            match tally.get_mut(old) {
                Some(count) if *count > 0 => *count -= 1,
                _ => warn!(
                    old_vote = old,
                    "previous vote missing from tally, not decremented"
                ),
            }
        }

        tally[index] += 1;
        state.current_vote = Some(index);

        Ok(VoteChange {
            old_vote,
            new_vote: index,
        })
    }
}
