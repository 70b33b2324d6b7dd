//! The VoteChain dashboard core.
//!
//! - [`VotingWorkflow`]: validate → submit → await confirmation → refresh →
//!   notify, for votes and new elections
//! - [`DashboardViewModel`]: the headless state behind the dashboard (bucket
//!   lists, selection, modals, form) with a stale-fetch guard per bucket
//! - [`ClientConfig`]: TOML configuration for node, contract and timeouts

pub mod config;
pub mod error;
pub mod form;
pub mod submission;
pub mod view_model;
pub mod workflow;

pub use config::{ClientConfig, ConfigError};
pub use error::{ConfirmationError, SubmissionError, ValidationError, WorkflowError};
pub use form::{parse_candidates, parse_time, ElectionForm, FormField, NewElection};
pub use submission::{PendingSubmission, SubmissionKind, SubmissionPayload, SubmissionStatus};
pub use view_model::{DashboardViewModel, ElectionCard, Modal, RefreshOutcome, SelectedCandidate};
pub use workflow::VotingWorkflow;
