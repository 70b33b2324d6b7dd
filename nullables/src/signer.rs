//! Nullable signer: record submissions, optionally reject them.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use votechain_chain::{ContractCall, TxHandle};
use votechain_types::WalletAddress;
use votechain_wallet::{WalletError, WalletSigner};

use crate::chain::NullChain;

/// A signer that hands accepted calls to a [`NullChain`].
///
/// Every invocation of `submit` is recorded, including rejected ones.
pub struct NullSigner {
    chain: Arc<NullChain>,
    address: WalletAddress,
    submitted: Mutex<Vec<ContractCall>>,
    rejection: Mutex<Option<String>>,
    delay: Mutex<Duration>,
}

impl NullSigner {
    pub fn new(chain: Arc<NullChain>, address: WalletAddress) -> Self {
        Self {
            chain,
            address,
            submitted: Mutex::new(Vec::new()),
            rejection: Mutex::new(None),
            delay: Mutex::new(Duration::ZERO),
        }
    }

    /// Reject every following submission with `message`.
    pub fn reject_with(&self, message: &str) {
        *self.rejection.lock().unwrap() = Some(message.to_string());
    }

    pub fn accept(&self) {
        *self.rejection.lock().unwrap() = None;
    }

    /// Make each submission take `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// All calls passed to `submit` (for assertions).
    pub fn submitted(&self) -> Vec<ContractCall> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submit_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl WalletSigner for NullSigner {
    fn address(&self) -> &WalletAddress {
        &self.address
    }

    async fn submit(&self, call: ContractCall) -> Result<TxHandle, WalletError> {
        self.submitted.lock().unwrap().push(call.clone());
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let rejection = self.rejection.lock().unwrap().clone();
        match rejection {
            Some(message) => Err(WalletError::Rejected(message)),
            None => Ok(self.chain.enqueue(self.address.clone(), call)),
        }
    }
}
