//! Election records assembled from the contract's read calls.

use serde::{Deserialize, Serialize};
use votechain_types::{ElectionId, Timestamp, WalletAddress};

use crate::status::{resolve, ElectionStatus};

/// A candidate and their current tally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub vote_count: u64,
}

/// An election as stored by the voting contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    pub id: ElectionId,
    pub title: String,
    pub description: String,
    /// Voting opens at this instant.
    pub start_time: Timestamp,
    /// Voting closes at this instant (exclusive).
    pub end_time: Timestamp,
    pub creator: WalletAddress,
    /// Index-aligned with the contract's candidate arrays; the index is what
    /// a `vote` call takes.
    pub candidates: Vec<Candidate>,
}

impl Election {
    /// Status at `now`. Recompute on every query.
    pub fn status_at(&self, now: Timestamp) -> ElectionStatus {
        resolve(self.start_time, self.end_time, now)
    }

    pub fn candidate(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// Sum of all tallies, capped at `u64::MAX`.
    pub fn total_votes(&self) -> u64 {
        self.candidates
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(c.vote_count))
    }

    /// Candidate with the highest tally; the first listed wins ties.
    /// `None` before any vote is cast.
    pub fn leader(&self) -> Option<&Candidate> {
        let mut best: Option<&Candidate> = None;
        for candidate in &self.candidates {
            if candidate.vote_count > best.map_or(0, |b| b.vote_count) {
                best = Some(candidate);
            }
        }
        best
    }
}
