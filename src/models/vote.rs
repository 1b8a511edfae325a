//! Captain votes on a match result.

use crate::models::game::{MatchId, Side};
use crate::models::team::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user's claim about who won. At most one per (match, user); re-voting overwrites.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResultVote {
    pub match_id: MatchId,
    pub user_id: UserId,
    pub voted_for: Side,
    pub cast_at: DateTime<Utc>,
}

/// Vote counts per side, for rendering "teams disagree".
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub team_a: u32,
    pub team_b: u32,
}

impl VoteTally {
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a MatchResultVote>) -> Self {
        votes.into_iter().fold(Self::default(), |mut t, v| {
            match v.voted_for {
                Side::TeamA => t.team_a += 1,
                Side::TeamB => t.team_b += 1,
            }
            t
        })
    }
}
