use thiserror::Error;
use votechain_chain::ChainError;

#[derive(Debug, Clone, Error)]
pub enum WalletError {
    #[error("no authenticated user")]
    NotAuthenticated,

    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("identity provider error: {0}")]
    Provider(String),

    #[error("node RPC error: {0}")]
    Node(String),
}

impl From<ChainError> for WalletError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::Node(msg) => WalletError::Rejected(msg),
            other => WalletError::Node(other.to_string()),
        }
    }
}
