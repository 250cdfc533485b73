//! Update dispatcher
//!
//! Every handler receives the shared [`GateContext`] and a [`ChatTransport`]
//! bound to the incoming event. Subscription is re-checked on every event
//! and fails closed.

use crate::config::{GateSettings, ACCEPTED_URL_SCHEMES, COMMAND_PREFIX};
use crate::membership::{is_subscribed, MembershipChecker};
use crate::seen_users::SeenUsers;
use crate::shortener::{is_short_url, Shortener};
use crate::transport::ChatTransport;
use crate::views::{welcome_card, DefaultGateView, GateView};
use crate::UserId;
use anyhow::Result;
use chrono::Local;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared state and collaborators for all handlers
pub struct GateContext {
    settings: Arc<GateSettings>,
    seen_users: SeenUsers,
    membership: Arc<dyn MembershipChecker>,
    shortener: Arc<dyn Shortener>,
}

impl GateContext {
    /// Create a context with an empty seen-users set
    #[must_use]
    pub fn new(
        settings: Arc<GateSettings>,
        membership: Arc<dyn MembershipChecker>,
        shortener: Arc<dyn Shortener>,
    ) -> Self {
        Self {
            settings,
            seen_users: SeenUsers::new(),
            membership,
            shortener,
        }
    }

    /// Bot settings
    #[must_use]
    pub fn settings(&self) -> &GateSettings {
        &self.settings
    }

    /// Users recorded by /start since startup
    #[must_use]
    pub const fn seen_users(&self) -> &SeenUsers {
        &self.seen_users
    }

    async fn check_subscription(&self, user_id: UserId) -> bool {
        is_subscribed(self.membership.as_ref(), self.settings.channel_id, user_id).await
    }

    /// /start: record the user and send the welcome card for their side of the gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the card cannot be delivered.
    pub async fn on_start(&self, chat: &dyn ChatTransport, user_id: UserId) -> Result<()> {
        if self.seen_users.record(user_id).await {
            info!("New user {user_id} initiated /start.");
        }

        let subscribed = self.check_subscription(user_id).await;
        let card = welcome_card(&self.settings, subscribed);
        chat.send_card(&card).await
    }

    /// "I subscribed" button: re-check and confirm in place, or alert.
    ///
    /// The callback query is answered exactly once, after the check, so the
    /// alert is not swallowed by an earlier empty answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the callback answer or the caption edit fails.
    pub async fn on_check_subscription(
        &self,
        chat: &dyn ChatTransport,
        user_id: UserId,
    ) -> Result<()> {
        if self.check_subscription(user_id).await {
            info!("User {user_id} confirmed subscription.");
            chat.answer_callback(None, false).await?;
            chat.edit_caption(DefaultGateView::subscription_confirmed())
                .await
        } else {
            chat.answer_callback(Some(DefaultGateView::subscription_not_found()), true)
                .await
        }
    }

    /// "Shorten a link" button: tell the user what to send next.
    ///
    /// # Errors
    ///
    /// Returns an error if the callback answer fails.
    pub async fn on_shorten_action(&self, chat: &dyn ChatTransport, user_id: UserId) -> Result<()> {
        info!("User {user_id} pressed the shorten button.");
        chat.answer_callback(Some(DefaultGateView::shorten_hint()), false)
            .await
    }

    /// Free text: shorten it if the user is subscribed and it looks like a link.
    ///
    /// # Errors
    ///
    /// Returns an error if a reply cannot be delivered. Shortener failures are
    /// reported to the user and logged, never returned.
    pub async fn on_text_message(
        &self,
        chat: &dyn ChatTransport,
        user_id: UserId,
        text: &str,
    ) -> Result<()> {
        if text.starts_with(COMMAND_PREFIX) {
            return Ok(());
        }

        if !self.check_subscription(user_id).await {
            return chat.send_text(DefaultGateView::subscription_required()).await;
        }

        let url = text.trim();
        if !ACCEPTED_URL_SCHEMES
            .iter()
            .any(|scheme| url.starts_with(scheme))
        {
            return chat.send_text(DefaultGateView::not_a_link()).await;
        }

        chat.send_text(DefaultGateView::shortening_in_progress())
            .await?;

        match self.shortener.shorten(url).await {
            Ok(short_url) if is_short_url(&short_url) => {
                info!("Shortened link for user {user_id}: {short_url}");
                chat.send_text(&DefaultGateView::shortened(&short_url, url))
                    .await
            }
            Ok(payload) => {
                warn!("Unexpected shortener payload for user {user_id}: {payload:?}");
                chat.send_text(DefaultGateView::shorten_failed()).await
            }
            Err(e) => {
                error!("Shortener call failed for user {user_id}: {e}");
                chat.send_text(DefaultGateView::shorten_error()).await
            }
        }
    }

    /// /admin: statistics for the configured admin, a bare denial for everyone else.
    ///
    /// # Errors
    ///
    /// Returns an error if the reply cannot be delivered.
    pub async fn on_admin_command(&self, chat: &dyn ChatTransport, user_id: UserId) -> Result<()> {
        if !self.settings.is_admin(user_id) {
            warn!("User {user_id} tried to open the admin panel.");
            return chat.send_text(DefaultGateView::access_denied()).await;
        }

        let report = DefaultGateView::admin_report(
            self.seen_users.count().await,
            self.settings.channel_id,
            &Local::now(),
        );
        chat.send_text(&report).await
    }
}
