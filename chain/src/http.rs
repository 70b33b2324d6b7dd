//! [`ChainClient`] over a node's JSON-RPC API.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use votechain_types::WalletAddress;

use crate::call::{ContractCall, Receipt, TxHandle};
use crate::client::ChainClient;
use crate::error::ChainError;
use crate::rpc::RpcTransport;

/// Reads the voting contract at a fixed address through `contract_read` and
/// polls `transaction_receipt` until a receipt appears.
#[derive(Clone)]
pub struct HttpChainClient {
    transport: RpcTransport,
    contract: WalletAddress,
    poll_interval: Duration,
}

impl HttpChainClient {
    pub fn new(transport: RpcTransport, contract: WalletAddress, poll_interval: Duration) -> Self {
        Self {
            transport,
            contract,
            poll_interval,
        }
    }

    pub fn contract(&self) -> &WalletAddress {
        &self.contract
    }

    pub fn transport(&self) -> &RpcTransport {
        &self.transport
    }

    /// One receipt lookup; `None` while the transaction is still pending.
    pub async fn receipt(&self, handle: &TxHandle) -> Result<Option<Receipt>, ChainError> {
        let result = self
            .transport
            .call(
                "transaction_receipt",
                json!({ "hash": handle.hash.to_string() }),
            )
            .await?;
        decode_receipt(result)
    }
}

fn decode_receipt(result: Value) -> Result<Option<Receipt>, ChainError> {
    if result.is_null() {
        return Ok(None);
    }
    serde_json::from_value(result)
        .map(Some)
        .map_err(|e| ChainError::decode("transaction_receipt", e))
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn read(&self, call: ContractCall) -> Result<Value, ChainError> {
        tracing::debug!(contract = %self.contract, %call, "contract read");
        self.transport
            .call(
                "contract_read",
                json!({
                    "address": self.contract.as_str(),
                    "function": call.function,
                    "args": call.args,
                }),
            )
            .await
    }

    async fn wait_for_receipt(&self, handle: &TxHandle) -> Result<Receipt, ChainError> {
        loop {
            if let Some(receipt) = self.receipt(handle).await? {
                tracing::debug!(
                    hash = %receipt.tx_hash,
                    block = receipt.block_number,
                    "receipt available"
                );
                return Ok(receipt);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::ReceiptStatus;

    #[test]
    fn null_receipt_is_pending() {
        assert_eq!(decode_receipt(Value::Null).unwrap(), None);
    }

    #[test]
    fn receipt_object_decodes() {
        let receipt = decode_receipt(json!({
            "hash": format!("0x{}", "01".repeat(32)),
            "block_number": 3,
            "status": "success",
        }))
        .unwrap()
        .unwrap();
        assert_eq!(receipt.status, ReceiptStatus::Success);
    }

    #[test]
    fn malformed_receipt_is_decode_error() {
        assert!(matches!(
            decode_receipt(json!({ "hash": "0x12" })),
            Err(ChainError::Decode { .. })
        ));
    }
}
