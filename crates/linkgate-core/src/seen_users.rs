//! Process-lifetime record of users that pressed /start.
//!
//! Insert-only and never persisted: the set is empty after every restart and
//! is only used to report a count on /admin.

use crate::UserId;
use std::collections::HashSet;
use tokio::sync::Mutex;

/// Unordered, insert-only set of user IDs
#[derive(Debug, Default)]
pub struct SeenUsers {
    users: Mutex<HashSet<UserId>>,
}

impl SeenUsers {
    /// Creates an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a user. Returns `true` if the user was not seen before.
    pub async fn record(&self, user_id: UserId) -> bool {
        self.users.lock().await.insert(user_id)
    }

    /// Number of distinct users recorded since startup
    pub async fn count(&self) -> usize {
        self.users.lock().await.len()
    }
}
