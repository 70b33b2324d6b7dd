//! Wallet session: connecting the signed-in user's embedded wallet.

use std::sync::Arc;
use tokio::sync::RwLock;
use votechain_types::WalletAddress;

use crate::error::WalletError;
use crate::identity::IdentityProvider;

/// Tracks which wallet, if any, is connected for this client.
pub struct WalletSession {
    provider: Arc<dyn IdentityProvider>,
    connected: RwLock<Option<WalletAddress>>,
}

impl WalletSession {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            connected: RwLock::new(None),
        }
    }

    /// Connect the current user's wallet, provisioning one first if needed.
    ///
    /// Fails with [`WalletError::NotAuthenticated`] when nobody is signed in.
    pub async fn launch(&self) -> Result<WalletAddress, WalletError> {
        let user = self
            .provider
            .current_user()
            .await
            .ok_or(WalletError::NotAuthenticated)?;

        if !self.provider.has_embedded_wallet(&user) {
            tracing::info!(user = %user.id, "provisioning embedded wallet");
            self.provider.create_wallet(&user).await?;
        }

        let address = self.provider.connect(&user).await?;
        tracing::info!(user = %user.id, address = %address.short(), "wallet connected");
        *self.connected.write().await = Some(address.clone());
        Ok(address)
    }

    pub async fn disconnect(&self) {
        self.provider.disconnect().await;
        if let Some(address) = self.connected.write().await.take() {
            tracing::info!(address = %address.short(), "wallet disconnected");
        }
    }

    pub async fn connected_address(&self) -> Option<WalletAddress> {
        self.connected.read().await.clone()
    }

    /// Abbreviated connected address for a "connected as" label.
    pub async fn display_address(&self) -> Option<String> {
        self.connected.read().await.as_ref().map(WalletAddress::short)
    }

    pub async fn is_connected(&self) -> bool {
        self.connected.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::User;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const ADDR: &str = "0x1234567890abcdef1234567890abcdef12345678";

    struct ScriptedProvider {
        user: Option<User>,
        has_wallet: Mutex<bool>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedProvider {
        fn new(user: Option<User>, has_wallet: bool) -> Self {
            Self {
                user,
                has_wallet: Mutex::new(has_wallet),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IdentityProvider for ScriptedProvider {
        async fn current_user(&self) -> Option<User> {
            self.user.clone()
        }

        fn has_embedded_wallet(&self, _user: &User) -> bool {
            *self.has_wallet.lock().unwrap()
        }

        async fn create_wallet(&self, _user: &User) -> Result<(), WalletError> {
            self.calls.lock().unwrap().push("create_wallet");
            *self.has_wallet.lock().unwrap() = true;
            Ok(())
        }

        async fn connect(&self, _user: &User) -> Result<WalletAddress, WalletError> {
            self.calls.lock().unwrap().push("connect");
            Ok(WalletAddress::parse(ADDR).unwrap())
        }

        async fn disconnect(&self) {
            self.calls.lock().unwrap().push("disconnect");
        }
    }

    fn alice() -> User {
        User {
            id: "user-1".into(),
            email: Some("alice@example.org".into()),
        }
    }

    #[tokio::test]
    async fn launch_without_user_fails() {
        let provider = Arc::new(ScriptedProvider::new(None, false));
        let session = WalletSession::new(provider.clone());
        assert!(matches!(
            session.launch().await,
            Err(WalletError::NotAuthenticated)
        ));
        assert!(provider.calls().is_empty());
        assert!(!session.is_connected().await);
    }

    #[tokio::test]
    async fn launch_creates_wallet_when_missing() {
        let provider = Arc::new(ScriptedProvider::new(Some(alice()), false));
        let session = WalletSession::new(provider.clone());
        let address = session.launch().await.unwrap();
        assert_eq!(address.as_str(), ADDR);
        assert_eq!(provider.calls(), vec!["create_wallet", "connect"]);
        assert_eq!(session.display_address().await.as_deref(), Some("0x1234...5678"));
    }

    #[tokio::test]
    async fn launch_reuses_existing_wallet() {
        let provider = Arc::new(ScriptedProvider::new(Some(alice()), true));
        let session = WalletSession::new(provider.clone());
        session.launch().await.unwrap();
        assert_eq!(provider.calls(), vec!["connect"]);
    }

    #[tokio::test]
    async fn disconnect_clears_address() {
        let provider = Arc::new(ScriptedProvider::new(Some(alice()), true));
        let session = WalletSession::new(provider.clone());
        session.launch().await.unwrap();
        session.disconnect().await;
        assert_eq!(session.connected_address().await, None);
        assert_eq!(provider.calls(), vec!["connect", "disconnect"]);
    }
}
