//! Binding for the voting contract's ABI.
//!
//! View functions:
//! - `getActiveElections()`, `getUpcomingElections()`, `getPastElections()` → `uint[]`
//! - `getElection(id)` → `{ id, title, description, startTime, endTime, creator }`
//! - `getCandidates(id)` → `[string[] names, uint[] voteCounts]`
//!
//! State-changing functions:
//! - `vote(electionId, candidateIndex)`
//! - `createElection(title, description, startTime, endTime, candidateNames)`

use serde_json::json;
use votechain_types::{Bucket, ElectionId, Timestamp};

use crate::call::ContractCall;

/// Function names and argument encoding for the voting contract.
pub struct ElectionContract;

impl ElectionContract {
    pub const GET_ACTIVE_ELECTIONS: &'static str = "getActiveElections";
    pub const GET_UPCOMING_ELECTIONS: &'static str = "getUpcomingElections";
    pub const GET_PAST_ELECTIONS: &'static str = "getPastElections";
    pub const GET_ELECTION: &'static str = "getElection";
    pub const GET_CANDIDATES: &'static str = "getCandidates";
    pub const VOTE: &'static str = "vote";
    pub const CREATE_ELECTION: &'static str = "createElection";

    /// The list function backing a bucket.
    pub fn list_function(bucket: Bucket) -> &'static str {
        match bucket {
            Bucket::Active => Self::GET_ACTIVE_ELECTIONS,
            Bucket::Upcoming => Self::GET_UPCOMING_ELECTIONS,
            Bucket::Past => Self::GET_PAST_ELECTIONS,
        }
    }

    pub fn list_call(bucket: Bucket) -> ContractCall {
        ContractCall::bare(Self::list_function(bucket))
    }

    pub fn election_call(id: ElectionId) -> ContractCall {
        ContractCall::new(Self::GET_ELECTION, vec![json!(id.as_u64())])
    }

    pub fn candidates_call(id: ElectionId) -> ContractCall {
        ContractCall::new(Self::GET_CANDIDATES, vec![json!(id.as_u64())])
    }

    pub fn vote_call(id: ElectionId, candidate_index: usize) -> ContractCall {
        ContractCall::new(Self::VOTE, vec![json!(id.as_u64()), json!(candidate_index)])
    }

    pub fn create_election_call(
        title: &str,
        description: &str,
        start_time: Timestamp,
        end_time: Timestamp,
        candidate_names: &[String],
    ) -> ContractCall {
        ContractCall::new(
            Self::CREATE_ELECTION,
            vec![
                json!(title),
                json!(description),
                json!(start_time.as_secs()),
                json!(end_time.as_secs()),
                json!(candidate_names),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_call_per_bucket() {
        assert_eq!(ElectionContract::list_call(Bucket::Active).function, "getActiveElections");
        assert_eq!(ElectionContract::list_call(Bucket::Upcoming).function, "getUpcomingElections");
        assert_eq!(ElectionContract::list_call(Bucket::Past).function, "getPastElections");
        assert!(ElectionContract::list_call(Bucket::Past).args.is_empty());
    }

    #[test]
    fn create_election_encodes_seconds_and_names() {
        let call = ElectionContract::create_election_call(
            "Board Election",
            "Yearly board vote",
            Timestamp::new(1_746_057_600),
            Timestamp::new(1_746_835_200),
            &["Alice".to_string(), "Bob".to_string()],
        );
        assert_eq!(call.function, "createElection");
        assert_eq!(
            call.args,
            vec![
                json!("Board Election"),
                json!("Yearly board vote"),
                json!(1_746_057_600u64),
                json!(1_746_835_200u64),
                json!(["Alice", "Bob"]),
            ]
        );
    }

    #[test]
    fn vote_call_args() {
        let call = ElectionContract::vote_call(ElectionId::new(5), 1);
        assert_eq!(call.args, vec![json!(5), json!(1)]);
    }
}
