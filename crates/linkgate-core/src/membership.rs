//! Channel membership lookups
//!
//! The transport answers "what is this user's status in the channel"; this
//! module decides whether that status counts as a subscription.

use crate::UserId;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error};

/// Errors that can occur while looking up a channel member
#[derive(Error, Debug)]
pub enum MembershipError {
    /// The chat platform rejected the request (bot not in channel, bad chat ID...)
    #[error("API error: {0}")]
    Api(String),
    /// Error during network communication
    #[error("Network error: {0}")]
    Network(String),
}

/// Status of a user in the gated channel, as reported by the chat platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    /// Channel owner
    Creator,
    /// Channel administrator
    Administrator,
    /// Regular subscriber
    Member,
    /// Subscriber with restrictions
    Restricted,
    /// Not in the channel
    Left,
    /// Banned from the channel
    Kicked,
}

impl MembershipStatus {
    /// Whether this status grants access to the bot.
    ///
    /// `creator`, `administrator`, `member` and `restricted` count as subscribed.
    #[must_use]
    pub const fn is_subscribed(self) -> bool {
        matches!(
            self,
            Self::Creator | Self::Administrator | Self::Member | Self::Restricted
        )
    }

    /// Bot API name of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Creator => "creator",
            Self::Administrator => "administrator",
            Self::Member => "member",
            Self::Restricted => "restricted",
            Self::Left => "left",
            Self::Kicked => "kicked",
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interface for channel membership lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipChecker: Send + Sync {
    /// Status of `user_id` in the channel `channel_id`
    async fn membership_status(
        &self,
        channel_id: i64,
        user_id: UserId,
    ) -> Result<MembershipStatus, MembershipError>;
}

/// Resolves whether a user is subscribed.
///
/// Fails closed: a lookup error is logged and treated as "not subscribed".
pub async fn is_subscribed(
    checker: &dyn MembershipChecker,
    channel_id: i64,
    user_id: UserId,
) -> bool {
    match checker.membership_status(channel_id, user_id).await {
        Ok(status) => {
            debug!("User {user_id} has status '{status}' in channel {channel_id}.");
            status.is_subscribed()
        }
        Err(e) => {
            error!("Subscription check failed for user {user_id}: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_subscribed_statuses() {
        for status in [
            MembershipStatus::Creator,
            MembershipStatus::Administrator,
            MembershipStatus::Member,
            MembershipStatus::Restricted,
        ] {
            let mut mock = MockMembershipChecker::new();
            mock.expect_membership_status()
                .with(eq(-100), eq(7))
                .returning(move |_, _| Ok(status));

            assert!(is_subscribed(&mock, -100, 7).await, "{status} should pass");
        }
    }

    #[tokio::test]
    async fn test_unsubscribed_statuses() {
        for status in [MembershipStatus::Left, MembershipStatus::Kicked] {
            let mut mock = MockMembershipChecker::new();
            mock.expect_membership_status()
                .returning(move |_, _| Ok(status));

            assert!(!is_subscribed(&mock, -100, 7).await, "{status} should fail");
        }
    }

    #[tokio::test]
    async fn test_lookup_error_fails_closed() {
        let mut mock = MockMembershipChecker::new();
        mock.expect_membership_status()
            .returning(|_, _| Err(MembershipError::Network("connection reset".to_string())));

        assert!(!is_subscribed(&mock, -100, 7).await);
    }
}
