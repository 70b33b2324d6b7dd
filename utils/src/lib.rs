//! Shared utilities for the VoteChain client.

pub mod logging;
pub mod notify;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use notify::{Notifier, TracingNotifier};
pub use time::format_duration;
