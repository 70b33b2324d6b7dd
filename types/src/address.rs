//! Wallet address type with `0x` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// An account address on the ledger: `0x` followed by 40 hex digits.
///
/// Stored lowercased so that two spellings of the same account compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// The standard prefix for all addresses.
    pub const PREFIX: &'static str = "0x";

    /// Number of hex digits after the prefix.
    pub const HEX_LEN: usize = 40;

    /// Parse and normalise an address.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix(Self::PREFIX)
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| TypesError::InvalidAddress(raw.to_string()))?;
        if digits.len() != Self::HEX_LEN || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypesError::InvalidAddress(raw.to_string()));
        }
        Ok(Self(format!("{}{}", Self::PREFIX, digits.to_ascii_lowercase())))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display, e.g. `0xa2f3...39fb`.
    pub fn short(&self) -> String {
        let s = &self.0;
        format!("{}...{}", &s[..6], &s[s.len() - 4..])
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WalletAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<WalletAddress> for String {
    fn from(addr: WalletAddress) -> Self {
        addr.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0xA2F3000000000000000000000000000000039fB0";

    #[test]
    fn parse_normalises_case() {
        let addr = WalletAddress::parse(ADDR).unwrap();
        assert_eq!(addr.as_str(), "0xa2f3000000000000000000000000000000039fb0");
        assert_eq!(addr, ADDR.to_lowercase().parse().unwrap());
    }

    #[test]
    fn short_keeps_prefix_and_tail() {
        let addr = WalletAddress::parse(ADDR).unwrap();
        assert_eq!(addr.short(), "0xa2f3...9fb0");
    }

    #[test]
    fn rejects_malformed() {
        assert!(WalletAddress::parse("a2f3000000000000000000000000000000039fb0").is_err());
        assert!(WalletAddress::parse("0x1234").is_err());
        assert!(WalletAddress::parse("0xzz f3000000000000000000000000000000039f").is_err());
    }

    #[test]
    fn serde_uses_plain_string() {
        let addr = WalletAddress::parse(ADDR).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0xa2f3000000000000000000000000000000039fb0\"");
        let back: WalletAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
        assert!(serde_json::from_str::<WalletAddress>("\"nope\"").is_err());
    }
}
