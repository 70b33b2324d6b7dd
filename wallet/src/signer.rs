//! Submitting state-changing calls through a connected wallet.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use votechain_chain::{ChainError, ContractCall, RpcTransport, TxHandle};
use votechain_types::{TxHash, WalletAddress};

use crate::error::WalletError;

/// Capability to sign and submit a contract call.
///
/// Injected wherever a submission happens; nothing reaches for a global
/// wallet object.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// The account the signer submits from.
    fn address(&self) -> &WalletAddress;

    /// Sign and relay `call`, returning a handle once the node accepted it.
    ///
    /// Acceptance is not confirmation; await the receipt separately.
    async fn submit(&self, call: ContractCall) -> Result<TxHandle, WalletError>;
}

#[derive(Debug, Deserialize)]
struct WriteResult {
    hash: String,
}

/// Signer backed by the node's custodial `contract_write` action.
///
/// The identity provider's embedded wallet holds the key; the node relays
/// the signed transaction and answers with its hash.
#[derive(Clone)]
pub struct RpcWalletSigner {
    transport: RpcTransport,
    contract: WalletAddress,
    from: WalletAddress,
}

impl RpcWalletSigner {
    pub fn new(transport: RpcTransport, contract: WalletAddress, from: WalletAddress) -> Self {
        Self {
            transport,
            contract,
            from,
        }
    }
}

#[async_trait]
impl WalletSigner for RpcWalletSigner {
    fn address(&self) -> &WalletAddress {
        &self.from
    }

    async fn submit(&self, call: ContractCall) -> Result<TxHandle, WalletError> {
        tracing::info!(from = %self.from.short(), %call, "submitting transaction");
        let result = self
            .transport
            .call(
                "contract_write",
                json!({
                    "from": self.from.as_str(),
                    "address": self.contract.as_str(),
                    "function": call.function,
                    "args": call.args,
                }),
            )
            .await?;

        let write: WriteResult = serde_json::from_value(result)
            .map_err(|e| WalletError::from(ChainError::decode("contract_write", e)))?;
        let hash = TxHash::from_hex(&write.hash)
            .map_err(|e| WalletError::Node(format!("invalid transaction hash: {e}")))?;
        Ok(TxHandle::new(hash))
    }
}
