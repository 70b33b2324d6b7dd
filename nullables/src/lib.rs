//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the client (clock, chain node, wallet,
//! identity provider, notification sink) is abstracted behind a trait. This
//! crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (delays, failures, rejections)
//! - Record what was asked of them for assertions
//! - Never leave the loopback interface
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod clock;
pub mod identity;
pub mod node;
pub mod notifier;
pub mod signer;

pub use chain::{NullChain, ReceiptMode, StoredElection};
pub use clock::NullClock;
pub use identity::NullIdentity;
pub use node::StubNode;
pub use notifier::{NullNotifier, Notification};
pub use signer::NullSigner;
