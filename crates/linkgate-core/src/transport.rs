//! Chat transport seam.
//!
//! A transport is bound to the chat (and, for button presses, the callback
//! query and message) of a single incoming event.

use crate::reply::ReplyCard;
use anyhow::Result;
use async_trait::async_trait;

/// Outbound operations the dispatcher needs from a chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, text: &str) -> Result<()>;

    /// Send a photo with caption and inline keyboard.
    async fn send_card(&self, card: &ReplyCard) -> Result<()>;

    /// Replace the caption of the message the event came from.
    async fn edit_caption(&self, caption: &str) -> Result<()>;

    /// Answer the callback query of the event.
    ///
    /// With `show_alert` the text is shown as a modal alert instead of a toast.
    async fn answer_callback(&self, text: Option<&str>, show_alert: bool) -> Result<()>;
}
