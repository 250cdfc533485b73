//! `ChatTransport` implementation over the Telegram Bot API.

use crate::bot::keyboards::inline_keyboard;
use crate::bot::resilient::{
    answer_callback_resilient, edit_caption_resilient, send_message_resilient,
    send_photo_resilient,
};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use linkgate_core::reply::ReplyCard;
use linkgate_core::transport::ChatTransport;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, CallbackQueryId, ChatId, InputFile, MessageId};
use teloxide::{ApiError, RequestError};
use tracing::debug;
use url::Url;

/// Telegram-specific chat transport bound to one incoming event.
pub struct TelegramChatTransport {
    bot: Bot,
    chat_id: ChatId,
    message_id: Option<MessageId>,
    callback_id: Option<CallbackQueryId>,
}

impl TelegramChatTransport {
    /// Transport replying into the chat of an incoming message.
    #[must_use]
    pub const fn for_message(bot: Bot, msg: &Message) -> Self {
        Self {
            bot,
            chat_id: msg.chat.id,
            message_id: None,
            callback_id: None,
        }
    }

    /// Transport for a button press: answers the query, edits the pressed message.
    ///
    /// Falls back to the user's private chat when the message is unavailable.
    #[must_use]
    pub fn for_callback(bot: Bot, q: &CallbackQuery) -> Self {
        let (chat_id, message_id) = q.message.as_ref().map_or_else(
            || (ChatId::from(q.from.id), None),
            |msg| (msg.chat().id, Some(msg.id())),
        );
        Self {
            bot,
            chat_id,
            message_id,
            callback_id: Some(q.id.clone()),
        }
    }
}

#[async_trait]
impl ChatTransport for TelegramChatTransport {
    async fn send_text(&self, text: &str) -> Result<()> {
        send_message_resilient(&self.bot, self.chat_id, text).await?;
        Ok(())
    }

    async fn send_card(&self, card: &ReplyCard) -> Result<()> {
        let keyboard = inline_keyboard(&card.keyboard)?;
        let image = Url::parse(&card.image)
            .with_context(|| format!("Invalid card image URL: {}", card.image))?;

        send_photo_resilient(
            &self.bot,
            self.chat_id,
            InputFile::url(image),
            &card.caption,
            keyboard,
        )
        .await?;
        Ok(())
    }

    async fn edit_caption(&self, caption: &str) -> Result<()> {
        let Some(message_id) = self.message_id else {
            bail!("No message to edit in chat {}", self.chat_id);
        };

        match edit_caption_resilient(&self.bot, self.chat_id, message_id, caption).await {
            Ok(_) => Ok(()),
            Err(RequestError::Api(ApiError::MessageNotModified)) => {
                debug!("Caption update skipped: message is not modified");
                Ok(())
            }
            Err(e) => Err(anyhow!("Telegram edit error: {e}")),
        }
    }

    async fn answer_callback(&self, text: Option<&str>, show_alert: bool) -> Result<()> {
        let Some(callback_id) = &self.callback_id else {
            bail!("No callback query to answer in chat {}", self.chat_id);
        };

        answer_callback_resilient(&self.bot, callback_id, text, show_alert).await?;
        Ok(())
    }
}
