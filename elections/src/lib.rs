//! Elections as the VoteChain client sees them.
//!
//! The voting contract owns the lifecycle (pending → active → ended) and the
//! tallies. This crate reads them back:
//! - [`ElectionRepository`] lists ids per bucket and assembles full records,
//!   fanning out detail reads concurrently
//! - [`resolve`] derives a display status from an election's window and the
//!   current time; it is never stored

pub mod election;
pub mod error;
pub mod repository;
pub mod status;

pub use election::{Candidate, Election};
pub use error::FetchError;
pub use repository::{BucketRefresher, ElectionRepository};
pub use status::{resolve, ElectionStatus};
