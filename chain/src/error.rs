use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ChainError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("node error: {0}")]
    Node(String),

    #[error("invalid response for {context}: {reason}")]
    Decode { context: String, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ChainError {
    pub fn decode(context: impl Into<String>, reason: impl ToString) -> Self {
        ChainError::Decode {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}
