//! Chain access for the VoteChain client.
//!
//! - [`ChainClient`]: read-only contract calls and receipt polling, the seam
//!   every higher layer talks through.
//! - [`ElectionContract`]: the voting contract's function names and argument
//!   encoding.
//! - [`HttpChainClient`]: a [`ChainClient`] backed by a node's JSON-RPC API.

pub mod call;
pub mod client;
pub mod contract;
pub mod error;
pub mod http;
pub mod rpc;

pub use call::{ContractCall, Receipt, ReceiptStatus, TxHandle};
pub use client::ChainClient;
pub use contract::ElectionContract;
pub use error::ChainError;
pub use http::HttpChainClient;
pub use rpc::RpcTransport;
