//! In-flight submissions.

use serde::Serialize;
use std::fmt;
use votechain_types::{ElectionId, TxHash};

use crate::form::NewElection;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SubmissionKind {
    Vote,
    CreateElection,
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubmissionKind::Vote => "vote",
            SubmissionKind::CreateElection => "create-election",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SubmissionPayload {
    Vote {
        election_id: ElectionId,
        candidate_index: usize,
    },
    CreateElection(NewElection),
}

impl SubmissionPayload {
    pub fn kind(&self) -> SubmissionKind {
        match self {
            SubmissionPayload::Vote { .. } => SubmissionKind::Vote,
            SubmissionPayload::CreateElection(_) => SubmissionKind::CreateElection,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SubmissionStatus {
    /// Waiting for the wallet to sign and relay.
    Submitting,
    /// Relayed; waiting for the receipt.
    Confirming,
    Succeeded,
    Failed,
}

/// A vote or creation request between user confirmation and settlement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PendingSubmission {
    pub payload: SubmissionPayload,
    pub status: SubmissionStatus,
    /// Known once the wallet accepted the transaction.
    pub tx_hash: Option<TxHash>,
}

impl PendingSubmission {
    pub fn new(payload: SubmissionPayload) -> Self {
        Self {
            payload,
            status: SubmissionStatus::Submitting,
            tx_hash: None,
        }
    }

    pub fn kind(&self) -> SubmissionKind {
        self.payload.kind()
    }
}
