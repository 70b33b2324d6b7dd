//! Election identifiers and lifecycle buckets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Opaque numeric election id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectionId(u64);

impl ElectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for ElectionId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_start_matches('#')
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TypesError::InvalidElectionId(s.to_string()))
    }
}

impl From<u64> for ElectionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// One of the three election groupings, determined by the contract from
/// the current time relative to each election's window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Active,
    Upcoming,
    Past,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Active, Bucket::Upcoming, Bucket::Past];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Active => "active",
            Bucket::Upcoming => "upcoming",
            Bucket::Past => "past",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Bucket::Active),
            "upcoming" => Ok(Bucket::Upcoming),
            "past" => Ok(Bucket::Past),
            other => Err(TypesError::InvalidBucket(other.to_string())),
        }
    }
}
