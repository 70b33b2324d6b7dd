//! Nullable notifier: record notifications instead of showing them.

use std::sync::Mutex;
use votechain_utils::Notifier;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// A notifier that keeps every message for assertions.
#[derive(Default)]
pub struct NullNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl NullNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Success(m) => Some(m),
                Notification::Error(_) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Error(m) => Some(m),
                Notification::Success(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl Notifier for NullNotifier {
    fn notify_success(&self, message: &str) {
        self.sent
            .lock()
            .unwrap()
            .push(Notification::Success(message.to_string()));
    }

    fn notify_error(&self, message: &str) {
        self.sent
            .lock()
            .unwrap()
            .push(Notification::Error(message.to_string()));
    }
}
