use thiserror::Error;
use votechain_chain::ChainError;
use votechain_types::ElectionId;

#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("chain read failed: {0}")]
    Chain(#[from] ChainError),

    #[error("unexpected {function} result: {reason}")]
    Decode { function: String, reason: String },

    #[error("election {id}: {names} candidate names but {counts} vote counts")]
    CandidateMismatch {
        id: ElectionId,
        names: usize,
        counts: usize,
    },
}
