//! Testing helpers and mock utilities.
//!
//! Provides mocked membership/shortener seams and a transport that records
//! every outbound operation.

use crate::config::GateSettings;
use crate::membership::{MembershipStatus, MockMembershipChecker};
use crate::reply::ReplyCard;
use crate::shortener::MockShortener;
use crate::transport::ChatTransport;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// Channel ID used by [`test_settings`]
pub const TEST_CHANNEL_ID: i64 = -1_003_593_858_012;
/// Admin ID used by [`test_settings`]
pub const TEST_ADMIN_ID: i64 = 7_918_849_670;

/// Settings with dummy credentials and default endpoints.
#[must_use]
pub fn test_settings() -> GateSettings {
    GateSettings {
        bot_token: "123456:TEST".to_string(),
        channel_id: TEST_CHANNEL_ID,
        invite_link: "https://t.me/test_channel".to_string(),
        admin_id: TEST_ADMIN_ID,
        welcome_image_url: "https://images.example/welcome.jpg".to_string(),
        shortener_api_url: "https://tinyurl.com/api-create.php".to_string(),
        shortener_timeout_secs: 5,
    }
}

/// Create a mock membership checker that reports `status` for every lookup.
#[must_use]
pub fn mock_membership(status: MembershipStatus) -> MockMembershipChecker {
    let mut mock = MockMembershipChecker::new();
    mock.expect_membership_status()
        .returning(move |_, _| Ok(status));
    mock
}

/// Create a mock shortener that fails the test if it is ever called.
#[must_use]
pub fn mock_shortener_unused() -> MockShortener {
    let mut mock = MockShortener::new();
    mock.expect_shorten().never();
    mock
}

/// One outbound operation seen by [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    /// `send_text`
    Text(String),
    /// `send_card`
    Card(ReplyCard),
    /// `edit_caption`
    EditCaption(String),
    /// `answer_callback`
    Answer {
        /// Toast/alert text
        text: Option<String>,
        /// Alert flag
        show_alert: bool,
    },
}

/// Transport that records instead of sending
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingTransport {
    fn push(&self, item: Sent) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(item);
        }
    }

    /// Everything sent so far, in order
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Only the plain text messages
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|item| match item {
                Sent::Text(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// The only thing sent, which must be a card
    pub fn single_card(&self) -> ReplyCard {
        match self.sent().as_slice() {
            [Sent::Card(card)] => card.clone(),
            other => panic!("expected exactly one card, got {other:?}"),
        }
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, text: &str) -> Result<()> {
        self.push(Sent::Text(text.to_string()));
        Ok(())
    }

    async fn send_card(&self, card: &ReplyCard) -> Result<()> {
        self.push(Sent::Card(card.clone()));
        Ok(())
    }

    async fn edit_caption(&self, caption: &str) -> Result<()> {
        self.push(Sent::EditCaption(caption.to_string()));
        Ok(())
    }

    async fn answer_callback(&self, text: Option<&str>, show_alert: bool) -> Result<()> {
        self.push(Sent::Answer {
            text: text.map(str::to_string),
            show_alert,
        });
        Ok(())
    }
}
