//! # Vote aggregation
//!
//! A user holds at most one vote per thread. The store runs the
//! read-previous / write / adjust-total sequence inside one transaction and
//! asks [`VoteEffect::between`] what to do, so the delta always comes from
//! the old and new voice rather than from the new voice alone.

use crate::models::{Thread, Voice};

/// What casting a vote does to the stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteEffect {
    /// No previous vote; a record is inserted.
    Inserted(Voice),
    /// The previous vote had the opposite voice and is overwritten.
    Changed { from: Voice, to: Voice },
    /// Same voice as before. Nothing is written.
    Unchanged(Voice),
}

impl VoteEffect {
    pub fn between(previous: Option<Voice>, next: Voice) -> Self {
        match previous {
            None => VoteEffect::Inserted(next),
            Some(prev) if prev == next => VoteEffect::Unchanged(next),
            Some(prev) => VoteEffect::Changed { from: prev, to: next },
        }
    }

    /// Amount to add to `Thread::votes`.
    pub fn delta(self) -> i64 {
        match self {
            VoteEffect::Inserted(voice) => voice.value(),
            VoteEffect::Changed { from, to } => to.value() - from.value(),
            VoteEffect::Unchanged(_) => 0,
        }
    }

    /// Whether the vote record must be written.
    pub fn writes(self) -> bool {
        !matches!(self, VoteEffect::Unchanged(_))
    }
}

/// The thread after the vote was applied, and what the vote did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastVote {
    pub thread: Thread,
    pub effect: VoteEffect,
}
