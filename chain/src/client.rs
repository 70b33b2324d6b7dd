//! The read-side seam between the client and a ledger node.

use async_trait::async_trait;
use serde_json::Value;

use crate::call::{ContractCall, Receipt, TxHandle};
use crate::error::ChainError;

/// Read-only access to the voting contract on a remote node.
///
/// Every call reads the current chain head; implementations must not cache.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Invoke a view function and return its decoded JSON result.
    async fn read(&self, call: ContractCall) -> Result<Value, ChainError>;

    /// Resolve once the transaction behind `handle` has a receipt.
    ///
    /// Has no timeout of its own; callers bound the wait.
    async fn wait_for_receipt(&self, handle: &TxHandle) -> Result<Receipt, ChainError>;
}
