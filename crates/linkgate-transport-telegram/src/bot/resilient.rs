//! Resilient messaging utilities with automatic retry for Telegram API operations.
//!
//! Only transient transport failures are retried, with exponential backoff
//! and jitter. API errors (blocked by user, bad request...) fail immediately.

use crate::config::{
    get_telegram_max_retries, TELEGRAM_API_INITIAL_BACKOFF_MS, TELEGRAM_API_MAX_BACKOFF_MS,
};
use std::future::Future;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, ChatId, InlineKeyboardMarkup, InputFile, Message, MessageId};
use teloxide::RequestError;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::warn;

/// Whether a failed request is worth repeating
#[must_use]
pub fn is_transient(error: &RequestError) -> bool {
    matches!(error, RequestError::Network(_) | RequestError::Io(_))
}

/// Run a Telegram API operation, retrying transient failures.
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or the first
/// non-transient error.
pub async fn retry_telegram_operation<F, Fut, T>(operation: F) -> Result<T, RequestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RequestError>>,
{
    let max_retries = get_telegram_max_retries();
    let retry_strategy = ExponentialBackoff::from_millis(TELEGRAM_API_INITIAL_BACKOFF_MS)
        .max_delay(Duration::from_millis(TELEGRAM_API_MAX_BACKOFF_MS))
        .map(jitter)
        .take(max_retries);

    RetryIf::start(retry_strategy, operation, is_transient)
        .await
        .map_err(|e| {
            warn!("Telegram API operation failed (max {max_retries} retries): {e}");
            e
        })
}

/// Send a text message with automatic retry on network failures.
///
/// # Errors
///
/// Returns the Telegram error after all retries are exhausted.
pub async fn send_message_resilient(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
) -> Result<Message, RequestError> {
    retry_telegram_operation(|| bot.send_message(chat_id, text).send()).await
}

/// Send a photo with caption and inline keyboard, retrying on network failures.
///
/// # Errors
///
/// Returns the Telegram error after all retries are exhausted.
pub async fn send_photo_resilient(
    bot: &Bot,
    chat_id: ChatId,
    photo: InputFile,
    caption: &str,
    keyboard: InlineKeyboardMarkup,
) -> Result<Message, RequestError> {
    retry_telegram_operation(|| {
        bot.send_photo(chat_id, photo.clone())
            .caption(caption)
            .reply_markup(keyboard.clone())
            .send()
    })
    .await
}

/// Replace the caption of a sent message, retrying on network failures.
///
/// # Errors
///
/// Returns the Telegram error after all retries are exhausted, including
/// `MessageNotModified` when the caption is unchanged.
pub async fn edit_caption_resilient(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    caption: &str,
) -> Result<Message, RequestError> {
    retry_telegram_operation(|| {
        bot.edit_message_caption(chat_id, message_id)
            .caption(caption)
            .send()
    })
    .await
}

/// Answer a callback query, retrying on network failures.
///
/// # Errors
///
/// Returns the Telegram error after all retries are exhausted.
pub async fn answer_callback_resilient(
    bot: &Bot,
    callback_id: &CallbackQueryId,
    text: Option<&str>,
    show_alert: bool,
) -> Result<(), RequestError> {
    retry_telegram_operation(|| {
        let mut req = bot.answer_callback_query(callback_id.clone());
        if let Some(text) = text {
            req = req.text(text);
        }
        if show_alert {
            req = req.show_alert(true);
        }
        req.send()
    })
    .await
    .map(|_| ())
}
