//! Channel membership over the Bot API `getChatMember` call.
//!
//! The bot must be an administrator of the channel, otherwise Telegram
//! answers with an error and the user is treated as not subscribed.

use async_trait::async_trait;
use linkgate_core::membership::{MembershipChecker, MembershipError, MembershipStatus};
use linkgate_core::UserId as GateUserId;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ChatMemberKind, UserId};
use teloxide::RequestError;

/// `MembershipChecker` backed by the Telegram Bot API
pub struct TelegramMembershipChecker {
    bot: Bot,
}

impl TelegramMembershipChecker {
    /// Create a checker that queries through `bot`
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Map a Telegram member kind onto the gate's status
#[must_use]
pub fn status_of(kind: &ChatMemberKind) -> MembershipStatus {
    if kind.is_owner() {
        MembershipStatus::Creator
    } else if kind.is_administrator() {
        MembershipStatus::Administrator
    } else if kind.is_restricted() {
        MembershipStatus::Restricted
    } else if kind.is_member() {
        MembershipStatus::Member
    } else if kind.is_banned() {
        MembershipStatus::Kicked
    } else {
        MembershipStatus::Left
    }
}

fn map_request_error(error: RequestError) -> MembershipError {
    match error {
        RequestError::Network(e) => MembershipError::Network(e.to_string()),
        RequestError::Io(e) => MembershipError::Network(e.to_string()),
        other => MembershipError::Api(other.to_string()),
    }
}

#[async_trait]
impl MembershipChecker for TelegramMembershipChecker {
    async fn membership_status(
        &self,
        channel_id: i64,
        user_id: GateUserId,
    ) -> Result<MembershipStatus, MembershipError> {
        let user = u64::try_from(user_id)
            .map(UserId)
            .map_err(|_| MembershipError::Api(format!("Invalid user ID: {user_id}")))?;

        let member = self
            .bot
            .get_chat_member(ChatId(channel_id), user)
            .await
            .map_err(map_request_error)?;

        Ok(status_of(&member.kind))
    }
}
