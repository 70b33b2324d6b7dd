//! Nullable identity provider: a scripted embedded-wallet service.

use async_trait::async_trait;
use std::sync::Mutex;
use votechain_types::WalletAddress;
use votechain_wallet::{IdentityProvider, User, WalletError};

/// Identity provider with a fixed user and a toggleable wallet.
pub struct NullIdentity {
    user: Mutex<Option<User>>,
    wallet: Mutex<Option<WalletAddress>>,
    address: WalletAddress,
    connected: Mutex<bool>,
    created: Mutex<u32>,
}

impl NullIdentity {
    /// A provider with nobody signed in.
    pub fn signed_out(address: WalletAddress) -> Self {
        Self {
            user: Mutex::new(None),
            wallet: Mutex::new(None),
            address,
            connected: Mutex::new(false),
            created: Mutex::new(0),
        }
    }

    /// A signed-in user who has not provisioned a wallet yet.
    pub fn new_user(id: &str, address: WalletAddress) -> Self {
        let provider = Self::signed_out(address);
        *provider.user.lock().unwrap() = Some(User {
            id: id.to_string(),
            email: None,
        });
        provider
    }

    /// A signed-in user who already holds an embedded wallet.
    pub fn with_wallet(id: &str, address: WalletAddress) -> Self {
        let provider = Self::new_user(id, address.clone());
        *provider.wallet.lock().unwrap() = Some(address);
        provider
    }

    pub fn wallets_created(&self) -> u32 {
        *self.created.lock().unwrap()
    }

    pub fn is_connected(&self) -> bool {
        *self.connected.lock().unwrap()
    }
}

#[async_trait]
impl IdentityProvider for NullIdentity {
    async fn current_user(&self) -> Option<User> {
        self.user.lock().unwrap().clone()
    }

    fn has_embedded_wallet(&self, _user: &User) -> bool {
        self.wallet.lock().unwrap().is_some()
    }

    async fn create_wallet(&self, _user: &User) -> Result<(), WalletError> {
        *self.wallet.lock().unwrap() = Some(self.address.clone());
        *self.created.lock().unwrap() += 1;
        Ok(())
    }

    async fn connect(&self, _user: &User) -> Result<WalletAddress, WalletError> {
        let wallet = self.wallet.lock().unwrap().clone();
        let address = wallet.ok_or_else(|| WalletError::Provider("no embedded wallet".into()))?;
        *self.connected.lock().unwrap() = true;
        Ok(address)
    }

    async fn disconnect(&self) {
        *self.connected.lock().unwrap() = false;
    }
}
