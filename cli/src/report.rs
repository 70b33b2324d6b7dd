//! Console rendering of elections and the post-transaction re-read.

use async_trait::async_trait;
use std::sync::Arc;
use votechain_dashboard::ElectionCard;
use votechain_elections::{BucketRefresher, Election, ElectionRepository, FetchError};
use votechain_types::{Bucket, Clock, ElectionId};

pub fn card_line(card: &ElectionCard) -> String {
    format!(
        "{:>6}  {:<32}  {:<8}  {}",
        card.id.to_string(),
        card.title,
        card.status,
        card.time_label
    )
}

/// One line per candidate; the leader is marked with `*`.
pub fn tally_lines(election: &Election) -> Vec<String> {
    let leader = election.leader();
    election
        .candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let mark = if leader.is_some_and(|l| std::ptr::eq(l, candidate)) {
                "*"
            } else {
                " "
            };
            format!("{mark} [{i}] {:<24} {}", candidate.name, candidate.vote_count)
        })
        .collect()
}

/// Re-reads a bucket after a confirmed transaction and prints it.
///
/// With a focus election only that election's tally is printed.
pub struct ConsoleRefresher {
    repository: ElectionRepository,
    clock: Arc<dyn Clock>,
    focus: Option<ElectionId>,
}

impl ConsoleRefresher {
    pub fn new(repository: ElectionRepository, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            focus: None,
        }
    }

    pub fn focused_on(mut self, id: ElectionId) -> Self {
        self.focus = Some(id);
        self
    }

    pub async fn report(&self, bucket: Bucket) -> Result<Vec<String>, FetchError> {
        let elections = self.repository.fetch_bucket(bucket).await?;
        Ok(self.render(bucket, &elections))
    }

    fn render(&self, bucket: Bucket, elections: &[Election]) -> Vec<String> {
        match self.focus {
            Some(id) => match elections.iter().find(|e| e.id == id) {
                Some(election) => {
                    let mut lines = vec![format!(
                        "{} {} ({} votes)",
                        election.id,
                        election.title,
                        election.total_votes()
                    )];
                    lines.extend(tally_lines(election));
                    lines
                }
                None => vec![format!("election {id} is no longer {bucket}")],
            },
            None => {
                let now = self.clock.now();
                let mut lines = vec![format!("{bucket} ({})", elections.len())];
                lines.extend(
                    elections
                        .iter()
                        .map(|e| card_line(&ElectionCard::new(e, now))),
                );
                lines
            }
        }
    }
}

#[async_trait]
impl BucketRefresher for ConsoleRefresher {
    async fn refresh(&self, bucket: Bucket) -> Result<(), FetchError> {
        for line in self.report(bucket).await? {
            println!("{line}");
        }
        Ok(())
    }
}
