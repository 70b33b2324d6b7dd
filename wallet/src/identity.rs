//! The embedded-wallet identity provider seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use votechain_types::WalletAddress;

use crate::error::WalletError;

/// An authenticated user as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Identity service that provisions and connects custodial wallets.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any.
    async fn current_user(&self) -> Option<User>;

    /// Whether the provider already holds an embedded wallet for `user`.
    fn has_embedded_wallet(&self, user: &User) -> bool;

    /// Provision an embedded wallet for `user`.
    async fn create_wallet(&self, user: &User) -> Result<(), WalletError>;

    /// Connect the user's embedded wallet and return its address.
    async fn connect(&self, user: &User) -> Result<WalletAddress, WalletError>;

    async fn disconnect(&self);
}
