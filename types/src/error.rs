//! Parse errors for the primitive types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("invalid election id: {0}")]
    InvalidElectionId(String),

    #[error("unknown election bucket: {0} (expected active, upcoming or past)")]
    InvalidBucket(String),
}
