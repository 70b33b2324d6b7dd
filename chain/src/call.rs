//! Contract call descriptions, transaction handles and receipts.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use votechain_types::TxHash;

/// A call to one function of the voting contract.
///
/// Arguments are already ABI-shaped JSON values; [`crate::ElectionContract`]
/// builds them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractCall {
    pub function: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl ContractCall {
    pub fn new(function: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            function: function.into(),
            args,
        }
    }

    /// A call with no arguments.
    pub fn bare(function: impl Into<String>) -> Self {
        Self::new(function, Vec::new())
    }
}

impl fmt::Display for ContractCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// Handle to a transaction accepted for relay but not yet confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHandle {
    pub hash: TxHash,
}

impl TxHandle {
    pub fn new(hash: TxHash) -> Self {
        Self { hash }
    }
}

/// Outcome recorded in a receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Inclusion receipt for a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(rename = "hash")]
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub status: ReceiptStatus,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}
