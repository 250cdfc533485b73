//! Keyboard descriptor to Telegram markup conversion

use anyhow::{Context, Result};
use linkgate_core::reply::{Button, InlineKeyboard};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

/// Render a keyboard descriptor as Telegram inline markup.
///
/// # Errors
///
/// Returns an error if a URL button carries an unparseable URL.
pub fn inline_keyboard(keyboard: &InlineKeyboard) -> Result<InlineKeyboardMarkup> {
    let rows = keyboard
        .rows
        .iter()
        .map(|row| row.iter().map(inline_button).collect::<Result<Vec<_>>>())
        .collect::<Result<Vec<_>>>()?;
    Ok(InlineKeyboardMarkup::new(rows))
}

fn inline_button(button: &Button) -> Result<InlineKeyboardButton> {
    match button {
        Button::Url { label, url } => {
            let url = Url::parse(url).with_context(|| format!("Invalid button URL: {url}"))?;
            Ok(InlineKeyboardButton::url(label.clone(), url))
        }
        Button::Callback { label, action } => {
            Ok(InlineKeyboardButton::callback(label.clone(), action.as_str()))
        }
    }
}
