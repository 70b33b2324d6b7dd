//! Wallet layer for VoteChain.
//!
//! Provides everything the client needs from a wallet:
//! - [`WalletSigner`]: submit a state-changing contract call
//! - [`IdentityProvider`]: the embedded-wallet identity service
//! - [`WalletSession`]: the connect / create-then-connect / disconnect flow

pub mod error;
pub mod identity;
pub mod session;
pub mod signer;

pub use error::WalletError;
pub use identity::{IdentityProvider, User};
pub use session::WalletSession;
pub use signer::{RpcWalletSigner, WalletSigner};
