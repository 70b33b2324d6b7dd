//! Fetching elections from the voting contract.

use async_trait::async_trait;
use futures_util::future::{try_join, try_join_all};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use votechain_chain::{ChainClient, ContractCall, ElectionContract};
use votechain_types::{Bucket, ElectionId, Timestamp, WalletAddress};

use crate::election::{Candidate, Election};
use crate::error::FetchError;

/// `getElection` result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElectionMetadata {
    id: u64,
    title: String,
    description: String,
    start_time: u64,
    end_time: u64,
    creator: WalletAddress,
}

/// Something that re-reads a bucket after a confirmed transaction.
#[async_trait]
pub trait BucketRefresher: Send + Sync {
    async fn refresh(&self, bucket: Bucket) -> Result<(), FetchError>;
}

/// Reads elections through a [`ChainClient`].
///
/// Holds no cache: every call reads the current chain head.
#[derive(Clone)]
pub struct ElectionRepository {
    chain: Arc<dyn ChainClient>,
}

impl ElectionRepository {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }

    /// Ids the contract currently places in `bucket`, in contract order.
    pub async fn list_ids(&self, bucket: Bucket) -> Result<Vec<ElectionId>, FetchError> {
        let ids: Vec<u64> = self.read_as(ElectionContract::list_call(bucket)).await?;
        Ok(ids.into_iter().map(ElectionId::new).collect())
    }

    /// Metadata and candidates for one election, read concurrently and merged.
    pub async fn fetch_details(&self, id: ElectionId) -> Result<Election, FetchError> {
        let (meta, (names, counts)): (ElectionMetadata, (Vec<String>, Vec<u64>)) = try_join(
            self.read_as(ElectionContract::election_call(id)),
            self.read_as(ElectionContract::candidates_call(id)),
        )
        .await?;

        if meta.id != id.as_u64() {
            return Err(FetchError::Decode {
                function: ElectionContract::GET_ELECTION.to_string(),
                reason: format!("asked for election {}, got {}", id.as_u64(), meta.id),
            });
        }
        if names.len() != counts.len() {
            return Err(FetchError::CandidateMismatch {
                id,
                names: names.len(),
                counts: counts.len(),
            });
        }

        let candidates = names
            .into_iter()
            .zip(counts)
            .map(|(name, vote_count)| Candidate { name, vote_count })
            .collect();

        Ok(Election {
            id,
            title: meta.title,
            description: meta.description,
            start_time: Timestamp::new(meta.start_time),
            end_time: Timestamp::new(meta.end_time),
            creator: meta.creator,
            candidates,
        })
    }

    /// Every election in `bucket`.
    ///
    /// Detail reads for all ids run concurrently. The result keeps the
    /// id-list order whatever order the reads finish in, and any single
    /// failure fails the whole bucket.
    pub async fn fetch_bucket(&self, bucket: Bucket) -> Result<Vec<Election>, FetchError> {
        let ids = self.list_ids(bucket).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(%bucket, count = ids.len(), "fetching election details");

        let elections = try_join_all(ids.into_iter().map(|id| self.fetch_details(id)))
            .await
            .inspect_err(|e| tracing::warn!(%bucket, error = %e, "bucket fetch failed"))?;
        Ok(elections)
    }

    async fn read_as<T: DeserializeOwned>(&self, call: ContractCall) -> Result<T, FetchError> {
        let function = call.function.clone();
        let value: Value = self.chain.read(call).await?;
        serde_json::from_value(value).map_err(|e| FetchError::Decode {
            function,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl BucketRefresher for ElectionRepository {
    async fn refresh(&self, bucket: Bucket) -> Result<(), FetchError> {
        let elections = self.fetch_bucket(bucket).await?;
        tracing::debug!(%bucket, count = elections.len(), "bucket refreshed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use votechain_nullables::{NullChain, NullClock, StoredElection};

    const DAY: u64 = 86_400;
    const NOW: u64 = 1_746_500_000;

    fn setup() -> (Arc<NullChain>, ElectionRepository) {
        let clock = Arc::new(NullClock::new(NOW));
        let chain = Arc::new(NullChain::new(clock));
        let repo = ElectionRepository::new(chain.clone());
        (chain, repo)
    }

    fn active(title: &str) -> StoredElection {
        StoredElection::new(title, NOW - DAY, NOW + DAY, &["Alice", "Bob"])
    }

    #[tokio::test]
    async fn empty_bucket_is_empty_not_error() {
        let (chain, repo) = setup();
        assert!(repo.fetch_bucket(Bucket::Active).await.unwrap().is_empty());
        assert_eq!(chain.read_count(ElectionContract::GET_ELECTION), 0);
    }

    #[tokio::test]
    async fn fetch_details_merges_metadata_and_tallies() {
        let (chain, repo) = setup();
        let id = chain.insert(active("Board Election").with_description("Yearly board vote"));
        chain.set_votes(id, 0, 2432);
        chain.set_votes(id, 1, 1890);

        let election = repo.fetch_details(id).await.unwrap();
        assert_eq!(election.title, "Board Election");
        assert_eq!(election.description, "Yearly board vote");
        assert_eq!(election.start_time, Timestamp::new(NOW - DAY));
        assert_eq!(
            election.candidates,
            vec![
                Candidate { name: "Alice".into(), vote_count: 2432 },
                Candidate { name: "Bob".into(), vote_count: 1890 },
            ]
        );
    }

    #[tokio::test]
    async fn buckets_partition_by_window() {
        let (chain, repo) = setup();
        let a = chain.insert(active("now"));
        let u = chain.insert(StoredElection::new("later", NOW + DAY, NOW + 2 * DAY, &["X"]));
        let p = chain.insert(StoredElection::new("before", NOW - 2 * DAY, NOW - DAY, &["Y"]));

        assert_eq!(repo.list_ids(Bucket::Active).await.unwrap(), vec![a]);
        assert_eq!(repo.list_ids(Bucket::Upcoming).await.unwrap(), vec![u]);
        assert_eq!(repo.list_ids(Bucket::Past).await.unwrap(), vec![p]);
    }

    #[tokio::test(start_paused = true)]
    async fn bucket_keeps_id_order_regardless_of_completion() {
        let (chain, repo) = setup();
        let first = chain.insert(active("one"));
        let second = chain.insert(active("two"));
        let third = chain.insert(active("three"));
        chain.set_list_order(Bucket::Active, vec![third, first, second]);
        // The first id listed resolves last.
        chain.delay_election(third, Duration::from_millis(300));
        chain.delay_election(first, Duration::from_millis(200));
        chain.delay_election(second, Duration::from_millis(10));

        let elections = repo.fetch_bucket(Bucket::Active).await.unwrap();
        let ids: Vec<_> = elections.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![third, first, second]);
    }

    #[tokio::test]
    async fn one_failed_detail_fails_the_bucket() {
        let (chain, repo) = setup();
        chain.insert(active("ok"));
        let broken = chain.insert(active("broken"));
        chain.fail_election(broken, "header not found");

        let err = repo.fetch_bucket(Bucket::Active).await.unwrap_err();
        assert!(err.to_string().contains("header not found"));
    }

    #[tokio::test]
    async fn list_failure_surfaces_as_chain_error() {
        let (chain, repo) = setup();
        chain.fail_reads(ElectionContract::GET_PAST_ELECTIONS, "rate limited");
        assert!(matches!(
            repo.fetch_bucket(Bucket::Past).await,
            Err(FetchError::Chain(_))
        ));
    }

    #[tokio::test]
    async fn reads_are_never_cached() {
        let (chain, repo) = setup();
        let id = chain.insert(active("tally"));
        assert_eq!(repo.fetch_details(id).await.unwrap().total_votes(), 0);
        chain.set_votes(id, 1, 4);
        assert_eq!(repo.fetch_details(id).await.unwrap().total_votes(), 4);
        assert_eq!(chain.read_count(ElectionContract::GET_CANDIDATES), 2);
    }

    #[tokio::test]
    async fn refresher_rereads_bucket() {
        let (chain, repo) = setup();
        chain.insert(active("one"));
        repo.refresh(Bucket::Active).await.unwrap();
        assert_eq!(chain.read_count(ElectionContract::GET_ACTIVE_ELECTIONS), 1);
        assert_eq!(chain.read_count(ElectionContract::GET_ELECTION), 1);
    }
}
