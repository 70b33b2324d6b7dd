//! Workflow error taxonomy.
//!
//! [`ValidationError`] is raised before any network call and is handled
//! locally (inline on the form). The others are surfaced to the user as
//! notifications; none of them is fatal.

use thiserror::Error;
use votechain_chain::ChainError;
use votechain_types::TxHash;
use votechain_wallet::WalletError;

use crate::submission::SubmissionKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no election selected")]
    MissingElection,

    #[error("no candidate selected")]
    MissingCandidate,

    #[error("election is not open for voting ({0})")]
    VotingClosed(&'static str),

    #[error("{0} is required")]
    EmptyField(&'static str),

    #[error("{field} is not a valid date: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("start time must be before end time")]
    InvertedRange,

    #[error("candidate {position} has an empty name")]
    EmptyCandidateName { position: usize },

    #[error("at least one candidate is required")]
    NoCandidates,
}

/// The wallet refused or failed to relay the transaction.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SubmissionError(#[from] pub WalletError);

/// The transaction was relayed but not confirmed.
#[derive(Debug, Clone, Error)]
pub enum ConfirmationError {
    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error("transaction not confirmed within {0}s")]
    Timeout(u64),

    #[error("could not confirm transaction: {0}")]
    Chain(#[from] ChainError),
}

#[derive(Debug, Clone, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Confirmation(#[from] ConfirmationError),

    #[error("a {0} submission is already in flight")]
    AlreadyInFlight(SubmissionKind),
}

impl WorkflowError {
    /// Whether the user should be told through a notification rather than
    /// inline or not at all.
    pub fn is_notifiable(&self) -> bool {
        matches!(
            self,
            WorkflowError::Submission(_) | WorkflowError::Confirmation(_)
        )
    }
}

impl From<WalletError> for WorkflowError {
    fn from(e: WalletError) -> Self {
        WorkflowError::Submission(SubmissionError(e))
    }
}
