//! Fundamental types for the VoteChain client.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: addresses, transaction hashes, election ids, timestamps and the
//! clock abstraction.

pub mod address;
pub mod election;
pub mod error;
pub mod hash;
pub mod time;

pub use address::WalletAddress;
pub use election::{Bucket, ElectionId};
pub use error::TypesError;
pub use hash::TxHash;
pub use time::{Clock, SystemClock, Timestamp};
